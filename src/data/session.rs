//! Append-only session history.

use tracing::warn;

use crate::sink::Sample;

/// Every sample of the current session in arrival order.
///
/// Single writer (ingestion) and one reader per frame (rendering); the buffer is
/// handed to both by reference and only ever grows until [`clear`](Self::clear).
#[derive(Debug, Clone, Default)]
pub struct SessionBuffer {
    samples: Vec<Sample>,
}

impl SessionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample.
    ///
    /// A session time earlier than the previous sample's breaks the collaborator's
    /// contract; it is held at the previous time so the ordering invariant survives.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn push(&mut self, mut sample: Sample) {
        if let Some(last) = self.samples.last() {
            if !(sample.session_time_micros >= last.session_time_micros) {
                warn!(
                    got = sample.session_time_micros,
                    previous = last.session_time_micros,
                    "session time went backwards; holding previous timestamp"
                );
                sample.session_time_micros = last.session_time_micros;
            }
        }
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Session time of the first sample.
    pub fn start_time(&self) -> Option<f64> {
        self.samples.first().map(|s| s.session_time_micros)
    }

    /// Samples that open a stroke: one strip-chart point per stroke.
    pub fn boundaries(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter().filter(|s| s.is_boundary())
    }

    /// Drop the history; only used when a new session starts.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_and_order_hold() {
        let mut buf = SessionBuffer::new();
        for (i, t) in [0.0, 10.0, 10.0, 5.0, 30.0].into_iter().enumerate() {
            buf.push(Sample::new(t, i as f64, 0.0, 0.0, 0.0));
        }
        assert_eq!(buf.len(), 5);
        let times: Vec<f64> = buf.samples().iter().map(|s| s.session_time_micros).collect();
        assert_eq!(times, vec![0.0, 10.0, 10.0, 10.0, 30.0]);
    }

    #[test]
    fn nan_time_is_held() {
        let mut buf = SessionBuffer::new();
        buf.push(Sample::new(7.0, 0.0, 0.0, 0.0, 0.0));
        buf.push(Sample::new(f64::NAN, 1.0, 0.0, 0.0, 0.0));
        assert_eq!(buf.latest().unwrap().session_time_micros, 7.0);
    }

    #[test]
    fn boundaries_filter_on_stroke_time() {
        let mut buf = SessionBuffer::new();
        for st in [0.0, 1.0, 2.0, 0.0, 1.0, 0.0] {
            buf.push(Sample::new(0.0, st, 0.0, 0.0, 0.0));
        }
        assert_eq!(buf.boundaries().count(), 3);
        assert_eq!(buf.start_time(), Some(0.0));
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.start_time(), None);
    }
}
