//! Rendering controller events for the terminal.

use client_core::{ClientError, ControllerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Unreachable,
    Rejected,
    ServerFault,
    Malformed,
}

pub fn classify_failure(error: &ClientError) -> FailureCategory {
    match error {
        ClientError::Decode(_) => FailureCategory::Malformed,
        ClientError::Transport { status: None, .. } => FailureCategory::Unreachable,
        ClientError::Transport {
            status: Some(status),
            ..
        } if *status >= 500 => FailureCategory::ServerFault,
        ClientError::Transport { .. } => FailureCategory::Rejected,
    }
}

pub fn describe_failure(error: &ClientError) -> String {
    match classify_failure(error) {
        FailureCategory::Unreachable => {
            "Diagram server unreachable; check the server URL and network, then retry.".to_string()
        }
        FailureCategory::Rejected => format!("Diagram server rejected the parameters: {error}"),
        FailureCategory::ServerFault => format!("Diagram server failed to render: {error}"),
        FailureCategory::Malformed => format!("Unexpected response from diagram server: {error}"),
    }
}

pub fn render_event(event: &ControllerEvent) -> String {
    match event {
        ControllerEvent::DiagramUpdated { token, query } => {
            let chord = query
                .chord_filter
                .chord()
                .map(|chord| format!(", chord {chord}"))
                .unwrap_or_default();
            format!(
                "[{token}] diagram: {} ({} frets, tuning {}{chord})",
                query.title(),
                query.frets,
                query.tuning
            )
        }
        ControllerEvent::ChordOptionsUpdated { token, options } => {
            format!("[{token}] chords: {}", options.join(" "))
        }
        ControllerEvent::ChordFilterReset { token, previous } => {
            format!("[{token}] chord {previous} is not in this scale; filter cleared")
        }
        ControllerEvent::FetchFailed { token, error } => {
            format!("[{token}] {}", describe_failure(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::RequestToken;

    #[test]
    fn classifies_by_status() {
        let unreachable = ClientError::Transport {
            status: None,
            message: "connection refused".into(),
        };
        let rejected = ClientError::Transport {
            status: Some(400),
            message: "note does not exist: H".into(),
        };
        let fault = ClientError::Transport {
            status: Some(500),
            message: "Internal Server Error".into(),
        };
        assert_eq!(classify_failure(&unreachable), FailureCategory::Unreachable);
        assert_eq!(classify_failure(&rejected), FailureCategory::Rejected);
        assert_eq!(classify_failure(&fault), FailureCategory::ServerFault);
        assert_eq!(
            classify_failure(&ClientError::Decode("eof".into())),
            FailureCategory::Malformed
        );
    }

    #[test]
    fn renders_reset_and_options() {
        let token = RequestToken(3);
        assert_eq!(
            render_event(&ControllerEvent::ChordOptionsUpdated {
                token,
                options: vec!["-".into(), "Am".into()],
            }),
            "[#3] chords: - Am"
        );
        assert!(render_event(&ControllerEvent::ChordFilterReset {
            token,
            previous: "Dm".into(),
        })
        .contains("Dm is not in this scale"));
    }
}
