use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::application::{Conversation, SubmitOutcome};

use super::super::Container;
use super::ask_controller::{format_outcome, submit_with_spinner};

const NEW_COMMAND: &str = "/new";
const QUIT_COMMAND: &str = "/quit";

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn chat(&self, session: Option<i64>) -> Result<String> {
        let mut conversation = self.container.conversation();
        if let Some(id) = session {
            conversation = conversation.resume(id);
        }

        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        writeln!(
            stdout,
            "Ask about political promises, projects, or MP performance. \
             {NEW_COMMAND} starts a new conversation, {QUIT_COMMAND} exits."
        )?;

        let asked = run_chat_loop(&mut conversation, stdin, &mut stdout).await?;
        Ok(format!("Goodbye. ({} questions asked)", asked))
    }
}

/// Read questions line by line until EOF or `/quit`; returns how many were sent.
pub(crate) async fn run_chat_loop<R, W>(
    conversation: &mut Conversation,
    input: R,
    output: &mut W,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut asked = 0;

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(output)?;
            break;
        };

        match line.trim() {
            QUIT_COMMAND => break,
            NEW_COMMAND => {
                conversation.reset();
                writeln!(output, "Started a new conversation.")?;
            }
            text => {
                let outcome = submit_with_spinner(conversation, text).await;
                if outcome == SubmitOutcome::Skipped {
                    continue;
                }
                asked += 1;
                writeln!(output, "{}\n", format_outcome(conversation, outcome))?;
            }
        }
    }

    Ok(asked)
}
