use std::time::Duration;

use batepapo_db::ChatStore;
use batepapo_types::events::PresenceEvent;
use batepapo_types::models::now_millis;
use tokio::time::{Instant, interval_at};
use tracing::{info, warn};

use crate::state::{AppState, with_store};

/// Background task that removes participants who stopped sending heartbeats.
///
/// Every `period` it announces the departure of each participant idle for longer
/// than `threshold` and deletes them. A failed pass is logged and the loop goes on.
pub async fn run_sweep_loop(state: AppState, period: Duration, threshold: Duration) {
    // First pass one full period after startup
    let mut interval = interval_at(Instant::now() + period, period);
    let threshold_ms = i64::try_from(threshold.as_millis()).unwrap_or(i64::MAX);

    info!(
        "Inactivity sweep running every {:?} (threshold {:?})",
        period, threshold
    );

    loop {
        interval.tick().await;

        let removed = with_store(&state, move |store| {
            Ok(sweep_inactive(store, now_millis(), threshold_ms)?)
        })
        .await;

        match removed {
            Ok(count) => {
                if count > 0 {
                    info!("Sweep: removed {} inactive participants", count);
                }
            }
            Err(e) => warn!("Sweep error: {:?}", e),
        }
    }
}

/// One sweep pass at `now_ms`. Returns how many participants were removed.
///
/// The leave announcement and the delete are separate writes; a failure between
/// them aborts the pass and the next one picks up whoever is still idle.
pub fn sweep_inactive(store: &dyn ChatStore, now_ms: i64, threshold_ms: i64) -> anyhow::Result<usize> {
    let mut removed = 0;

    for participant in store.list_participants()? {
        if !participant.is_inactive(now_ms, threshold_ms) {
            continue;
        }

        store.insert_message(&PresenceEvent::Left.announce(&participant.name))?;
        if store.delete_participant(&participant.name)? {
            info!("{} left the room (idle)", participant.name);
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::state::AppStateInner;
    use batepapo_db::MemoryStore;
    use batepapo_types::{Message, MessageKind, Participant};
    use uuid::Uuid;

    const PERIOD: Duration = Duration::from_secs(15);
    const THRESHOLD: Duration = Duration::from_secs(10);

    /// Fails `list_participants` once after `fail_next` is set.
    struct FlakyStore {
        inner: MemoryStore,
        fail_next: Arc<AtomicBool>,
    }

    impl ChatStore for FlakyStore {
        fn insert_participant(&self, participant: &Participant) -> anyhow::Result<bool> {
            self.inner.insert_participant(participant)
        }

        fn find_participant(&self, name: &str) -> anyhow::Result<Option<Participant>> {
            self.inner.find_participant(name)
        }

        fn list_participants(&self) -> anyhow::Result<Vec<Participant>> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                anyhow::bail!("store unavailable");
            }
            self.inner.list_participants()
        }

        fn touch_participant(&self, name: &str, last_status: i64) -> anyhow::Result<bool> {
            self.inner.touch_participant(name, last_status)
        }

        fn delete_participant(&self, name: &str) -> anyhow::Result<bool> {
            self.inner.delete_participant(name)
        }

        fn insert_message(&self, message: &Message) -> anyhow::Result<()> {
            self.inner.insert_message(message)
        }

        fn find_message(&self, id: Uuid) -> anyhow::Result<Option<Message>> {
            self.inner.find_message(id)
        }

        fn visible_messages(&self, user: &str) -> anyhow::Result<Vec<Message>> {
            self.inner.visible_messages(user)
        }

        fn delete_message(&self, id: Uuid) -> anyhow::Result<bool> {
            self.inner.delete_message(id)
        }
    }

    /// Lets the loop finish a pass that is running on the blocking pool.
    async fn wait_until_gone(state: &AppState, name: &str) -> bool {
        for _ in 0..100 {
            if state.store.find_participant(name).unwrap().is_none() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[test]
    fn removes_only_idle_participants() {
        let store = MemoryStore::new();
        store.insert_participant(&Participant::new("idle", 0)).unwrap();
        store.insert_participant(&Participant::new("active", 15_000)).unwrap();

        let removed = sweep_inactive(&store, 20_000, 10_000).unwrap();
        assert_eq!(removed, 1);

        let names: Vec<_> = store
            .list_participants()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["active"]);

        let leaves: Vec<_> = store
            .visible_messages("anyone")
            .unwrap()
            .into_iter()
            .filter(|m| m.kind == MessageKind::Status && m.text == "Sai da sala...")
            .collect();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].from, "idle");
    }

    #[test]
    fn idle_exactly_at_threshold_stays() {
        let store = MemoryStore::new();
        store.insert_participant(&Participant::new("ana", 10_000)).unwrap();

        assert_eq!(sweep_inactive(&store, 20_000, 10_000).unwrap(), 0);
        assert!(store.find_participant("ana").unwrap().is_some());
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let store = MemoryStore::new();
        store.insert_participant(&Participant::new("ana", 0)).unwrap();

        assert_eq!(sweep_inactive(&store, 60_000, 10_000).unwrap(), 1);
        assert_eq!(sweep_inactive(&store, 60_000, 10_000).unwrap(), 0);
        assert_eq!(store.visible_messages("ana").unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_first_sweeps_one_period_after_start() {
        let state = AppStateInner::new(MemoryStore::new());
        state
            .store
            .insert_participant(&Participant::new("idle", now_millis() - 60_000))
            .unwrap();
        state
            .store
            .insert_participant(&Participant::new("active", now_millis()))
            .unwrap();

        let sweeper = tokio::spawn(run_sweep_loop(state.clone(), PERIOD, THRESHOLD));

        tokio::time::sleep(PERIOD - Duration::from_secs(1)).await;
        assert!(state.store.find_participant("idle").unwrap().is_some());
        assert!(state.store.visible_messages("active").unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(wait_until_gone(&state, "idle").await);
        assert!(state.store.find_participant("active").unwrap().is_some());

        let leaves = state.store.visible_messages("active").unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].from, "idle");
        assert_eq!(leaves[0].text, "Sai da sala...");

        sweeper.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn loop_keeps_running_after_a_failed_pass() {
        let fail_next = Arc::new(AtomicBool::new(true));
        let state = AppStateInner::new(FlakyStore {
            inner: MemoryStore::new(),
            fail_next: fail_next.clone(),
        });
        state
            .store
            .insert_participant(&Participant::new("idle", now_millis() - 60_000))
            .unwrap();

        let sweeper = tokio::spawn(run_sweep_loop(state.clone(), PERIOD, THRESHOLD));

        // First pass hits the error
        tokio::time::sleep(PERIOD + Duration::from_secs(1)).await;
        for _ in 0..100 {
            if !fail_next.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!fail_next.load(Ordering::SeqCst));
        assert!(state.store.find_participant("idle").unwrap().is_some());

        // Second pass succeeds
        tokio::time::sleep(PERIOD).await;
        assert!(wait_until_gone(&state, "idle").await);
        assert_eq!(state.store.visible_messages("anyone").unwrap().len(), 1);

        sweeper.abort();
    }
}
