//! Mob behavior invocation.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::infrastructure::ports::{BehaviorError, BehaviorPort};

/// Behavior runtime used when no scripting engine is attached.
pub struct NoopBehavior;

#[async_trait]
impl BehaviorPort for NoopBehavior {
    async fn invoke(
        &self,
        template_name: &str,
        instance_id: Uuid,
        function: &str,
        _args: Vec<String>,
    ) -> Result<(), BehaviorError> {
        tracing::trace!(
            mob = %template_name,
            instance_id = %instance_id,
            function = %function,
            "Behavior invocation skipped, no runtime attached"
        );
        Ok(())
    }
}

/// Fires a behavior function without waiting for it.
///
/// Failures are logged and never reach the caller.
pub fn fire(
    behavior: &Arc<dyn BehaviorPort>,
    template_name: String,
    instance_id: Uuid,
    function: &'static str,
    args: Vec<String>,
) {
    let behavior = Arc::clone(behavior);
    tokio::spawn(async move {
        if let Err(e) = behavior
            .invoke(&template_name, instance_id, function, args)
            .await
        {
            tracing::warn!(
                error = %e,
                mob = %template_name,
                instance_id = %instance_id,
                function = %function,
                "Mob behavior invocation failed"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockBehaviorPort;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn failing_invocation_is_contained() {
        let (tx, rx) = oneshot::channel();
        let tx = std::sync::Mutex::new(Some(tx));

        let mut mock = MockBehaviorPort::new();
        mock.expect_invoke()
            .withf(|name, _, function, args| {
                name == "goblin" && function == "character_said" && args.len() == 1 && args[0] == "hi"
            })
            .returning(move |_, _, function, _| {
                if let Some(tx) = tx.lock().ok().and_then(|mut slot| slot.take()) {
                    let _ = tx.send(());
                }
                Err(BehaviorError::Failed {
                    function: function.to_string(),
                    message: "script error".to_string(),
                })
            });
        let behavior: Arc<dyn BehaviorPort> = Arc::new(mock);

        fire(
            &behavior,
            "goblin".to_string(),
            Uuid::new_v4(),
            "character_said",
            vec!["hi".to_string()],
        );

        rx.await.expect("invocation happened");
    }
}
