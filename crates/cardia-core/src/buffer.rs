use std::collections::VecDeque;

use crate::domain::Sample;

/// Fixed-capacity, time-ordered window of recent samples.
///
/// `push` always accepts; once full, the oldest sample is evicted to make
/// room. This bounds both memory and the cost of threshold recomputation.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append at the tail, evicting from the head when full.
    pub fn push(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Ordered copy of the current contents, oldest first. Used by the
    /// display path; does not mutate state.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(ts_us: i64, value: i32) -> Sample {
        Sample::new(ts_us, value)
    }

    #[test]
    fn test_bound_holds() {
        let mut buf = SampleBuffer::new(3);
        for i in 0..10 {
            buf.push(s(i, i as i32));
            assert!(buf.len() <= 3);
        }
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_oldest_evicted_first() {
        let mut buf = SampleBuffer::new(3);
        for i in 0..5 {
            buf.push(s(i, 100 + i as i32));
        }
        let values: Vec<i32> = buf.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![102, 103, 104]);
    }

    #[test]
    fn test_snapshot_ordered_and_nonmutating() {
        let mut buf = SampleBuffer::new(4);
        buf.push(s(0, 1));
        buf.push(s(1, 2));
        let snap = buf.snapshot();
        assert_eq!(snap, vec![s(0, 1), s(1, 2)]);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut buf = SampleBuffer::new(0);
        buf.push(s(0, 7));
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.capacity(), 1);
    }
}
