use anyhow::Result;
use inquire::InquireError;

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

/// Check if the inquire error is a user cancellation/interruption.
pub const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Runs an interactive flow and treats a cancelled prompt (Ctrl+C or Escape)
/// as a clean exit.
///
/// Prints a newline to tidy the terminal and returns `Ok(None)` when the
/// user cancelled.
pub fn handle_prompt_cancellation<T, F>(f: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(value) => Ok(Some(value)),
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            println!();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_prompt_cancellation_ok() {
        let result = handle_prompt_cancellation(|| Ok(3));
        assert!(matches!(result, Ok(Some(3))));
    }

    #[test]
    fn test_handle_prompt_cancellation_operation_canceled() {
        let result =
            handle_prompt_cancellation::<(), _>(|| Err(InquireError::OperationCanceled.into()));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_handle_prompt_cancellation_operation_interrupted() {
        let result =
            handle_prompt_cancellation::<(), _>(|| Err(InquireError::OperationInterrupted.into()));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_handle_prompt_cancellation_other_error() {
        let result =
            handle_prompt_cancellation::<(), _>(|| Err(anyhow::anyhow!("Geen verbinding")));
        let Err(err) = result else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("Geen verbinding"));
    }

    #[test]
    fn test_is_prompt_cancelled_other_error() {
        let err = InquireError::Custom("test".into());
        assert!(!is_prompt_cancelled(&err));
        assert!(is_prompt_cancelled(&InquireError::OperationCanceled));
    }
}
