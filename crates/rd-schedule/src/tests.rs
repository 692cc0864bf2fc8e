//! Unit tests for rd-schedule.

#[cfg(test)]
mod event_queue {
    use rd_core::{SimRng, SimTime};
    use crate::EventQueue;

    #[test]
    fn new_queue_is_empty() {
        let mut q: EventQueue<u32> = EventQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        assert_eq!(q.peek_time(), None);
        assert!(q.pop_min().is_none());
    }

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.push(SimTime(5.0), "five");
        q.push(SimTime(1.0), "one");
        q.push(SimTime(3.0), "three");
        assert_eq!(q.peek_time(), Some(SimTime(1.0)));
        let order: Vec<&str> = std::iter::from_fn(|| q.pop_min().map(|s| s.payload)).collect();
        assert_eq!(order, vec!["one", "three", "five"]);
    }

    #[test]
    fn equal_times_pop_fifo() {
        let mut q = EventQueue::new();
        for i in 0..20u32 {
            q.push(SimTime(7.0), i);
        }
        q.push(SimTime(0.0), 100);
        assert_eq!(q.pop_min().unwrap().payload, 100);
        for i in 0..20u32 {
            let s = q.pop_min().unwrap();
            assert_eq!(s.payload, i);
            assert_eq!(s.time, SimTime(7.0));
        }
        assert!(q.is_empty());
    }

    #[test]
    fn sequence_numbers_are_monotonic() {
        let mut q = EventQueue::new();
        assert_eq!(q.push(SimTime(3.0), ()), 0);
        assert_eq!(q.push(SimTime(1.0), ()), 1);
        q.pop_min();
        assert_eq!(q.push(SimTime(2.0), ()), 2);
        assert_eq!(q.pushed(), 3);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn interleaved_push_pop_is_sorted() {
        let mut rng = SimRng::new(31);
        let mut q = EventQueue::new();
        let mut popped = Vec::new();
        for round in 0..500u32 {
            // Coarse times to force plenty of ties.
            let t = SimTime(rng.gen_range(0..20u32) as f64);
            q.push(t, round);
            if round % 3 == 0 {
                popped.push(q.pop_min().unwrap());
            }
        }
        while let Some(s) = q.pop_min() {
            popped.push(s);
        }
        assert_eq!(popped.len(), 500);
        // Everything drained after the pushes stopped must be (time, seq) sorted.
        let tail = &popped[167..];
        assert!(tail.windows(2).all(|w| (w[0].time, w[0].seq) <= (w[1].time, w[1].seq)));
    }

    #[test]
    fn identical_push_sequences_replay_identically() {
        let run = || {
            let mut rng = SimRng::new(8);
            let mut q = EventQueue::new();
            for i in 0..100u32 {
                q.push(SimTime(rng.gen_range(0..5u32) as f64), i);
            }
            std::iter::from_fn(|| q.pop_min().map(|s| (s.time, s.seq, s.payload))).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
