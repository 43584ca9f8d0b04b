//! Human-readable lines for engine events.

use actions_runtime::{ActionEvent, CancelReason};

/// One-line description of an action event.
pub fn describe(event: &ActionEvent) -> String {
    match event {
        ActionEvent::Started {
            instance,
            action,
            actor,
            target,
            mode,
        } => format!(
            "{instance} {action} started by {actor} at {} ({mode})",
            target.type_name
        ),
        ActionEvent::Progressed {
            instance,
            hour,
            current,
            indicator,
        } => format!("{instance} at {hour}: {current:.1}/{indicator:.1}"),
        ActionEvent::Completed {
            instance,
            action,
            hour: Some(hour),
            ..
        } => format!("{instance} {action} completed at {hour}"),
        ActionEvent::Completed {
            instance, action, ..
        } => format!("{instance} {action} completed"),
        ActionEvent::Repeated { instance, cycle } => {
            format!("{instance} starting cycle {}", cycle + 1)
        }
        ActionEvent::Cancelled {
            instance,
            action,
            reason,
            ..
        } => format!("{instance} {action} cancelled: {}", reason_text(reason)),
        ActionEvent::InvocationFailed { action, error, .. } => {
            format!("{action} could not start: {error}")
        }
    }
}

fn reason_text(reason: &CancelReason) -> &str {
    match reason {
        CancelReason::Stopped => "stopped",
        CancelReason::ConditionsNotMet => "conditions no longer met",
        CancelReason::Timeout => "verification timed out",
        CancelReason::TrackingFailed { error } => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actions_core::{Hour, InstanceId, LocationId, Target};

    #[test]
    fn describes_progress_and_cancellation() {
        let progressed = ActionEvent::Progressed {
            instance: InstanceId(3),
            hour: Hour(2),
            current: 6.0,
            indicator: 10.0,
        };
        assert!(describe(&progressed).ends_with("6.0/10.0"));

        let cancelled = ActionEvent::Cancelled {
            instance: InstanceId(3),
            action: "Smuggle".into(),
            target: Target::location(LocationId(1), "Docks"),
            reason: CancelReason::ConditionsNotMet,
        };
        assert!(describe(&cancelled).contains("Smuggle cancelled: conditions no longer met"));
    }
}
