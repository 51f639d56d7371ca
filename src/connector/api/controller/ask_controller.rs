use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::{Conversation, SubmitOutcome};

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, question: String, session: Option<i64>) -> Result<String> {
        let mut conversation = self.container.conversation();
        if let Some(id) = session {
            conversation = conversation.resume(id);
        }

        let outcome = submit_with_spinner(&mut conversation, &question).await;
        Ok(format_outcome(&conversation, outcome))
    }
}

/// Submit while showing a "Checking Records..." spinner on stderr.
pub(crate) async fn submit_with_spinner(
    conversation: &mut Conversation,
    text: &str,
) -> SubmitOutcome {
    if text.trim().is_empty() {
        return SubmitOutcome::Skipped;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Checking Records...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = conversation.submit(text).await;

    spinner.finish_and_clear();
    outcome
}

pub(crate) fn format_outcome(conversation: &Conversation, outcome: SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Skipped => "Nothing to ask.".to_string(),
        SubmitOutcome::Failed => conversation.display().unwrap_or_default().to_string(),
        SubmitOutcome::Answered => {
            let mut output = "Accountability Report:\n\n".to_string();
            output.push_str(conversation.display().unwrap_or_default());
            if let Some(id) = conversation.session_id() {
                output.push_str(&format!("\n\n(session {})", id));
            }
            output
        }
    }
}
