//! Frame feed - bounded hand-off from a receive task to the buffer owner
//!
//! The producer never blocks: a full feed rejects the frame and the caller
//! decides whether to drop it. The consumer drains everything pending
//! right before sampling.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

use kinesync_core::{KinesyncError, KinesyncResult};
use kinesync_time::{Interpolator, TimedDataBuffer, TimedSample};

use crate::{MotionSource, MAX_FEED_CAPACITY};

/// Create a feed holding at most `capacity` pending frames, clamped to
/// `[1, MAX_FEED_CAPACITY]`
pub fn channel<T>(capacity: usize) -> (FrameSender<T>, FrameReceiver<T>) {
    let (tx, rx) = mpsc::channel(capacity.clamp(1, MAX_FEED_CAPACITY));
    (FrameSender { tx }, FrameReceiver { rx })
}

/// Producer half; cheap to clone
#[derive(Debug)]
pub struct FrameSender<T> {
    tx: mpsc::Sender<TimedSample<T>>,
}

impl<T> Clone for FrameSender<T> {
    fn clone(&self) -> Self {
        FrameSender {
            tx: self.tx.clone(),
        }
    }
}

impl<T> FrameSender<T> {
    /// Queue a frame without waiting
    pub fn send(&self, local_time: f64, source_time: f64, value: T) -> KinesyncResult<()> {
        self.send_sample(TimedSample::new(local_time, source_time, value))
    }

    pub fn send_sample(&self, sample: TimedSample<T>) -> KinesyncResult<()> {
        match self.tx.try_send(sample) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(
                    local_time = dropped.local_time,
                    source_time = dropped.source_time,
                    "frame feed full, dropping frame"
                );
                Err(KinesyncError::FeedFull)
            }
            Err(TrySendError::Closed(_)) => Err(KinesyncError::FeedClosed),
        }
    }

    /// Queue a frame, waiting for room
    pub async fn send_async(&self, local_time: f64, source_time: f64, value: T) -> KinesyncResult<()> {
        self.tx
            .send(TimedSample::new(local_time, source_time, value))
            .await
            .map_err(|_| KinesyncError::FeedClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half
#[derive(Debug)]
pub struct FrameReceiver<T> {
    rx: mpsc::Receiver<TimedSample<T>>,
}

impl<T> FrameReceiver<T> {
    /// Next pending frame; `Ok(None)` when nothing is queued
    pub fn try_recv(&mut self) -> KinesyncResult<Option<TimedSample<T>>> {
        match self.rx.try_recv() {
            Ok(sample) => Ok(Some(sample)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(KinesyncError::FeedClosed),
        }
    }

    /// Wait for the next frame; `None` once every sender is gone
    pub async fn recv(&mut self) -> Option<TimedSample<T>> {
        self.rx.recv().await
    }

    /// Move every pending frame into `buffer`, returning how many moved
    pub fn drain_into<I: Interpolator<T>>(&mut self, buffer: &mut TimedDataBuffer<T, I>) -> usize {
        let mut moved = 0;
        while let Ok(sample) = self.rx.try_recv() {
            buffer.add(sample.local_time, sample.source_time, sample.value);
            moved += 1;
        }
        moved
    }

    /// Move every pending frame into a shared source under one lock
    pub fn drain_into_source<I: Interpolator<T>>(&mut self, source: &MotionSource<T, I>) -> usize {
        source.with_buffer(|buffer| self.drain_into(buffer))
    }

    pub fn close(&mut self) {
        self.rx.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinesync_time::{DelayMode, LinearInterpolator};
    use proptest::prelude::*;

    fn buffer() -> TimedDataBuffer<f64, LinearInterpolator> {
        TimedDataBuffer::new(LinearInterpolator, 16, 1.0, DelayMode::None)
    }

    #[test]
    fn test_send_and_drain() {
        let (tx, mut rx) = channel(8);
        tx.send(0.0, 0.0, 0.0).unwrap();
        tx.send(0.1, 0.1, 1.0).unwrap();

        let mut buffer = buffer();
        assert_eq!(rx.drain_into(&mut buffer), 2);
        assert_eq!(buffer.len(), 2);
        assert!((buffer.try_get_sample(0.05).unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(rx.try_recv().unwrap(), None);
    }

    #[test]
    fn test_full_feed_rejects() {
        let (tx, _rx) = channel(2);
        tx.send(0.0, 0.0, 1.0).unwrap();
        tx.send(0.1, 0.1, 2.0).unwrap();
        assert_eq!(tx.send(0.2, 0.2, 3.0), Err(KinesyncError::FeedFull));
    }

    #[test]
    fn test_closed_feed() {
        let (tx, rx) = channel::<f64>(4);
        drop(rx);
        assert!(tx.is_closed());
        assert_eq!(tx.send(0.0, 0.0, 1.0), Err(KinesyncError::FeedClosed));

        let (tx, mut rx) = channel::<f64>(4);
        tx.send(0.0, 0.0, 1.0).unwrap();
        drop(tx);
        // Pending frames are still delivered after the sender is gone
        assert!(rx.try_recv().unwrap().is_some());
        assert_eq!(rx.try_recv(), Err(KinesyncError::FeedClosed));
    }

    #[test]
    fn test_zero_capacity_is_one() {
        let (tx, _rx) = channel(0);
        tx.send(0.0, 0.0, 1.0).unwrap();
        assert_eq!(tx.send(0.1, 0.1, 1.0), Err(KinesyncError::FeedFull));
    }

    #[test]
    fn test_oversized_capacity_is_clamped() {
        let (tx, mut rx) = channel::<f64>(usize::MAX);
        tx.send(0.0, 0.0, 1.0).unwrap();
        assert!(rx.try_recv().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_async_producer() {
        let (tx, mut rx) = channel(4);
        let producer = tokio::spawn(async move {
            for i in 0..10 {
                let t = i as f64 * 0.1;
                tx.send_async(t, t, i as f64).await.unwrap();
            }
        });

        let mut received = Vec::new();
        while let Some(sample) = rx.recv().await {
            received.push(sample.value);
        }
        producer.await.unwrap();

        assert_eq!(received, (0..10).map(|i| i as f64).collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn prop_drain_preserves_order(values in prop::collection::vec(-100.0f64..100.0, 1..32)) {
            let (tx, mut rx) = channel(values.len());
            for (i, v) in values.iter().enumerate() {
                let t = i as f64 * 0.01;
                tx.send(t, t, *v).unwrap();
            }

            let mut buffer = TimedDataBuffer::<f64, _>::new(LinearInterpolator, 32, 1.0, DelayMode::None);
            prop_assert_eq!(rx.drain_into(&mut buffer), values.len());
            let stored: Vec<f64> = buffer.iter().map(|s| s.value).collect();
            prop_assert_eq!(stored, values);
        }
    }
}
