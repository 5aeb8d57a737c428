use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Bounds for the simulated reply delay. Both ends are inclusive and
/// `min <= max` always holds; reversed bounds are swapped on construction
/// and on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDelayRange")]
pub struct DelayRange {
    #[serde(rename = "min_ms", with = "millis")]
    pub min: Duration,
    #[serde(rename = "max_ms", with = "millis")]
    pub max: Duration,
}

#[derive(Deserialize)]
struct RawDelayRange {
    #[serde(with = "millis")]
    min_ms: Duration,
    #[serde(with = "millis")]
    max_ms: Duration,
}

impl From<RawDelayRange> for DelayRange {
    fn from(raw: RawDelayRange) -> Self {
        Self::new(raw.min_ms, raw.max_ms)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(1_500),
            max: Duration::from_millis(3_000),
        }
    }
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// Deterministic pick within the range for a given seed.
    pub fn pick(&self, seed: u128) -> Duration {
        let span = self.max.saturating_sub(self.min).as_millis();
        if span == 0 {
            return self.min;
        }
        let offset = (seed % (span + 1)) as u64;
        self.min + Duration::from_millis(offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpReply {
    pub id: Uuid,
    pub actor_id: String,
    pub message: String,
    pub sent_at: jiff::Timestamp,
}

/// A scheduled reply. Dropping the handle does not cancel it.
#[derive(Debug)]
pub struct FollowUpHandle {
    id: Uuid,
    delay: Duration,
    task: JoinHandle<()>,
}

impl FollowUpHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Delivers simulated clinician replies after a randomized delay.
#[derive(Debug, Clone)]
pub struct FollowUpScheduler {
    range: DelayRange,
    sender: mpsc::Sender<FollowUpReply>,
}

impl FollowUpScheduler {
    pub fn new(range: DelayRange, capacity: usize) -> (Self, mpsc::Receiver<FollowUpReply>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { range, sender }, receiver)
    }

    pub fn range(&self) -> DelayRange {
        self.range
    }

    pub fn schedule(&self, actor_id: impl Into<String>, message: impl Into<String>) -> FollowUpHandle {
        let id = Uuid::new_v4();
        let delay = self.range.pick(id.as_u128());
        let actor_id = actor_id.into();
        let message = message.into();
        let sender = self.sender.clone();

        debug!(reply_id = %id, %actor_id, delay_ms = delay.as_millis() as u64, "follow-up scheduled");

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let reply = FollowUpReply {
                id,
                actor_id,
                message,
                sent_at: jiff::Timestamp::now(),
            };
            if sender.send(reply).await.is_err() {
                warn!(reply_id = %id, "follow-up receiver dropped");
            }
        });

        FollowUpHandle { id, delay, task }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
