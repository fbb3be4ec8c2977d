//! One-shot flows driven by the CLI.
//!
//! - [`ask`]: one text generation call.
//! - [`speak`]: a text generation call whose output is fed, unchanged, into a
//!   speech synthesis call.
//!
//! Both return without contacting the provider when the prompt is empty.

use tracing::{debug, info};

use crate::error::Result;
use crate::provider::GenerationProvider;
use crate::request::GenerationRequest;
use crate::response::InlineData;

/// Output of [`speak`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speech {
    /// Text returned by the first call and spoken by the second.
    pub text: String,
    /// Raw PCM returned by the speech call.
    pub audio: InlineData,
}

/// Generate text for `prompt`, steered by an optional `instruction`.
///
/// Returns an empty string, without a remote call, if `prompt` is empty.
///
/// # Errors
///
/// Propagates provider failures and malformed replies.
pub async fn ask<P>(provider: &P, instruction: Option<&str>, prompt: &str) -> Result<String>
where
    P: GenerationProvider + ?Sized,
{
    if prompt.is_empty() {
        debug!("empty prompt, skipping generation");
        return Ok(String::new());
    }

    let mut request = GenerationRequest::text(prompt)?;
    if let Some(instruction) = instruction {
        request = request.system_instruction(instruction);
    }

    info!(
        provider = provider.provider_name(),
        model = %request.model,
        "generating text"
    );
    let response = provider.generate(&request).await?;
    let text = response.text()?;
    debug!(chars = text.len(), "received text");

    Ok(text)
}

/// Generate text for `prompt`, then synthesize speech from that text.
///
/// Returns `None`, without any remote call, if `prompt` is empty.
///
/// # Errors
///
/// Propagates provider failures, an empty text reply (nothing to speak), and
/// a speech reply without inline audio.
pub async fn speak<P>(
    provider: &P,
    instruction: Option<&str>,
    prompt: &str,
) -> Result<Option<Speech>>
where
    P: GenerationProvider + ?Sized,
{
    if prompt.is_empty() {
        debug!("empty prompt, skipping generation and speech");
        return Ok(None);
    }

    let text = ask(provider, instruction, prompt).await?;

    let request = GenerationRequest::speech(text.as_str())?;
    info!(
        provider = provider.provider_name(),
        model = %request.model,
        voice = request.voice.as_deref().unwrap_or_default(),
        "synthesizing speech"
    );
    let audio = provider.generate(&request).await?.into_inline_data()?;
    debug!(
        bytes = audio.data.len(),
        mime_type = %audio.mime_type,
        "received audio"
    );

    Ok(Some(Speech { text, audio }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::{Error, LlmError};
    use crate::provider::MockProvider;
    use crate::request::{Modality, SPEECH_MODEL, TEXT_MODEL};
    use crate::response::GenerationResponse;

    const SONG_HISTORY: &str = "Bohemian Rhapsody was written by Freddie Mercury \
        and released by Queen in 1975.";

    mod ask {
        use super::*;

        #[tokio::test]
        async fn one_call_with_instruction() {
            let provider = MockProvider::new(vec![GenerationResponse::from_text(SONG_HISTORY)]);

            let text = ask(
                &provider,
                Some("Detail the history of the given song."),
                "Bohemian Rhapsody",
            )
            .await
            .unwrap();

            assert_eq!(text, SONG_HISTORY);
            assert_eq!(provider.calls(), 1);

            let sent = &provider.requests()[0];
            assert_eq!(sent.model, TEXT_MODEL);
            assert_eq!(sent.prompt, "Bohemian Rhapsody");
            assert_eq!(
                sent.system_instruction.as_deref(),
                Some("Detail the history of the given song.")
            );
            assert_eq!(sent.temperature, 0.0);
            assert_eq!(sent.max_output_tokens, 1000);
        }

        #[tokio::test]
        async fn without_instruction() {
            let provider = MockProvider::new(vec![GenerationResponse::from_text("ok")]);
            ask(&provider, None, "hello").await.unwrap();
            assert!(provider.requests()[0].system_instruction.is_none());
        }

        #[tokio::test]
        async fn empty_prompt_makes_no_call() {
            let provider = MockProvider::default();
            let text = ask(&provider, Some("Explain simply."), "").await.unwrap();
            assert!(text.is_empty());
            assert_eq!(provider.calls(), 0);
        }

        #[tokio::test]
        async fn empty_candidates_propagate() {
            let provider = MockProvider::new(vec![GenerationResponse::default()]);
            let err = ask(&provider, None, "hello").await.unwrap_err();
            assert!(matches!(err, Error::Llm(LlmError::ResponseFormat { .. })));
        }

        #[tokio::test]
        async fn provider_failure_propagates() {
            let provider = MockProvider::default();
            let err = ask(&provider, None, "hello").await.unwrap_err();
            assert!(matches!(err, Error::Llm(LlmError::Internal(_))));
        }
    }

    mod speak {
        use super::*;

        const EXPLANATION: &str = "Plants use sunlight to turn water and air into sugar.";

        #[tokio::test]
        async fn chains_text_into_speech() {
            let pcm = vec![0_u8, 1, 2, 3, 4, 5];
            let provider = MockProvider::new(vec![
                GenerationResponse::from_text(EXPLANATION),
                GenerationResponse::from_inline_data(
                    "audio/L16;codec=pcm;rate=24000",
                    pcm.clone(),
                ),
            ]);

            let speech = speak(&provider, Some("Explain simply."), "Explain photosynthesis")
                .await
                .unwrap()
                .unwrap();

            assert_eq!(speech.text, EXPLANATION);
            assert_eq!(speech.audio.data, pcm);
            assert_eq!(provider.calls(), 2);

            let requests = provider.requests();
            assert_eq!(requests[0].model, TEXT_MODEL);
            assert_eq!(requests[0].modality, Modality::Text);
            assert_eq!(requests[1].model, SPEECH_MODEL);
            assert_eq!(requests[1].modality, Modality::Audio);
            assert_eq!(requests[1].prompt, EXPLANATION);
            assert!(requests[1].system_instruction.is_none());
        }

        #[tokio::test]
        async fn second_prompt_is_first_reply_verbatim() {
            let reply = "  Leading spaces,\nnewlines\tand tabs stay.  ";
            let provider = MockProvider::new(vec![
                GenerationResponse::from_text(reply),
                GenerationResponse::from_inline_data("audio/L16", vec![0; 2]),
            ]);

            speak(&provider, None, "p").await.unwrap();

            assert_eq!(provider.requests()[1].prompt, reply);
        }

        #[tokio::test]
        async fn empty_prompt_makes_no_call() {
            let provider = MockProvider::default();
            let speech = speak(&provider, Some("Explain simply."), "").await.unwrap();
            assert!(speech.is_none());
            assert_eq!(provider.calls(), 0);
        }

        #[tokio::test]
        async fn empty_text_reply_stops_before_speech() {
            let provider = MockProvider::new(vec![GenerationResponse::from_text("")]);
            let err = speak(&provider, None, "p").await.unwrap_err();
            assert!(matches!(err, Error::Llm(LlmError::InvalidRequest(_))));
            assert_eq!(provider.calls(), 1);
        }

        #[tokio::test]
        async fn text_reply_to_speech_is_error() {
            let provider = MockProvider::new(vec![
                GenerationResponse::from_text("words"),
                GenerationResponse::from_text("not audio"),
            ]);
            let err = speak(&provider, None, "p").await.unwrap_err();
            assert!(matches!(err, Error::Llm(LlmError::ResponseFormat { .. })));
        }
    }
}
