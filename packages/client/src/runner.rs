//! Interactive client loop: renders subscription events and sends typed lines.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{mpsc, oneshot};

use crate::{
    config::ClientConfig,
    display::render_event,
    error::ClientError,
    sender::{MessageSender, SendOutcome},
    subscription::{ClientEvent, run_subscription},
};

/// Read lines on a dedicated thread until EOF / Ctrl-C.
///
/// The editor is created on that thread; creation errors are reported back.
async fn spawn_line_reader(lines: mpsc::UnboundedSender<String>) -> Result<(), ClientError> {
    let (ready_tx, ready_rx) = oneshot::channel::<Result<(), ReadlineError>>();
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => {
                let _ = ready_tx.send(Ok(()));
                editor
            }
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if lines.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Input error: {}", e);
                    break;
                }
            }
        }
    });

    match ready_rx.await {
        Ok(result) => result.map_err(ClientError::from),
        // Thread exited before reporting; input is unavailable
        Err(_) => Err(ClientError::from(ReadlineError::Eof)),
    }
}

/// Run the chat client until the user ends input.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ClientEvent>();
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();

    let subscription = tokio::spawn(run_subscription(config.clone(), event_tx));
    if let Err(e) = spawn_line_reader(line_tx).await {
        subscription.abort();
        return Err(e);
    }
    let sender = MessageSender::new(&config);

    tracing::info!(
        "Chatting on '{}' via {} (type a message and press Enter, Ctrl-D to quit)",
        config.channel,
        config.send_url()
    );

    let mut events_open = true;
    loop {
        tokio::select! {
            event = event_rx.recv(), if events_open => match event {
                Some(event) => println!("{}", render_event(&event)),
                // Subscription stopped; sending over HTTP still works
                None => events_open = false,
            },
            line = line_rx.recv() => match line {
                Some(line) => match sender.send(&line).await {
                    Ok(SendOutcome::Sent | SendOutcome::Skipped) => {}
                    Err(e) => eprintln!("Failed to send: {e}"),
                },
                None => break,
            },
        }
    }

    subscription.abort();
    Ok(())
}
