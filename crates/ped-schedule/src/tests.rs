//! Unit tests for ped-schedule.

#[cfg(test)]
mod timer {
    use ped_core::SimTime;

    use crate::TimerQueue;

    #[test]
    fn drains_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.push(SimTime(300), "c");
        q.push(SimTime(100), "a");
        q.push(SimTime(200), "b");
        q.push(SimTime(100), "a2");
        assert_eq!(q.len(), 4);
        assert_eq!(q.deadline_count(), 3);
        assert_eq!(q.drain_due(SimTime(200)), vec!["a", "a2", "b"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_deadline(), Some(SimTime(300)));
    }

    #[test]
    fn nothing_due_is_empty() {
        let mut q: TimerQueue<u32> = TimerQueue::new();
        q.push(SimTime(50), 1);
        assert!(q.drain_due(SimTime(49)).is_empty());
        assert_eq!(q.drain_due(SimTime(50)), vec![1]);
        assert!(q.is_empty());
    }

    #[test]
    fn iter_does_not_consume() {
        let mut q = TimerQueue::new();
        q.push(SimTime(5), 'x');
        q.push(SimTime(1), 'y');
        let seen: Vec<_> = q.iter().map(|(t, c)| (t.0, *c)).collect();
        assert_eq!(seen, vec![(1, 'y'), (5, 'x')]);
        assert_eq!(q.len(), 2);
    }
}

#[cfg(test)]
mod spawner {
    use ped_core::{LineId, NodeId, SimRng, SimTime, SpawnerId};

    use crate::{LineFlow, ScheduleError, SpawnRate, SpawnScheduler, SpawnerConfig, draw_line};

    #[test]
    fn fixed_interval() {
        let s = SpawnScheduler::new(vec![SpawnerConfig::new(
            NodeId(0),
            SpawnRate::Fixed { interval_secs: 2.0 },
        )])
        .unwrap();
        let mut rng = SimRng::new(1);
        let first = s.initial_deadlines(SimTime::ZERO, &mut rng);
        assert_eq!(first, vec![(SimTime(2_000), SpawnerId(0))]);
        assert_eq!(s.next_gap(SpawnerId(0), &mut rng), 2.0);
    }

    #[test]
    fn poisson_mean_gap() {
        let s = SpawnScheduler::new(vec![SpawnerConfig::new(
            NodeId(0),
            SpawnRate::Poisson { rate_per_sec: 4.0 },
        )])
        .unwrap();
        let mut rng = SimRng::new(9);
        let n = 20_000;
        let total: f32 = (0..n).map(|_| s.next_gap(SpawnerId(0), &mut rng)).sum();
        let mean = total / n as f32;
        assert!((mean - 0.25).abs() < 0.02, "mean gap {mean}");
    }

    #[test]
    fn rejects_non_positive_rates() {
        for rate in [
            SpawnRate::Fixed { interval_secs: 0.0 },
            SpawnRate::Poisson { rate_per_sec: 0.0 },
            SpawnRate::Poisson { rate_per_sec: -1.0 },
        ] {
            let r = SpawnScheduler::new(vec![SpawnerConfig::new(NodeId(0), rate)]);
            assert!(matches!(r, Err(ScheduleError::InvalidRate { .. })));
        }
    }

    #[test]
    fn fixed_flow_forces_line() {
        let mut rng = SimRng::new(3);
        assert_eq!(draw_line(LineFlow::Fixed { line: LineId(2) }, &mut rng), (Some(LineId(2)), true));
        assert_eq!(draw_line(LineFlow::None, &mut rng), (None, false));
    }

    #[test]
    fn asymmetric_share() {
        let mut rng = SimRng::new(5);
        let n = 10_000;
        let ones = (0..n)
            .filter(|_| draw_line(LineFlow::Asymmetric, &mut rng).0 == Some(LineId(1)))
            .count();
        let share = ones as f64 / n as f64;
        assert!((share - 0.2).abs() < 0.03, "share {share}");
    }

    #[test]
    fn symmetric_uses_both_lines() {
        let mut rng = SimRng::new(11);
        let lines: Vec<_> = (0..200).map(|_| draw_line(LineFlow::Symmetric, &mut rng).0).collect();
        assert!(lines.contains(&Some(LineId(1))));
        assert!(lines.contains(&Some(LineId(2))));
        assert!(lines.iter().all(|l| matches!(l, Some(LineId(1 | 2)))));
    }

    #[test]
    fn request_carries_goal_and_jitter() {
        let s = SpawnScheduler::new(vec![
            SpawnerConfig::new(NodeId(4), SpawnRate::Fixed { interval_secs: 1.0 })
                .with_goal(NodeId(9))
                .with_flow(LineFlow::None),
        ])
        .unwrap();
        let mut rng = SimRng::new(2);
        let req = s.request(SpawnerId(0), &mut rng).unwrap();
        assert_eq!(req.node, NodeId(4));
        assert_eq!(req.goal, Some(NodeId(9)));
        assert!(req.offset.x.abs() <= 0.5 && req.offset.y.abs() <= 0.5);
        assert!(s.request(SpawnerId(1), &mut rng).is_none());
    }
}

#[cfg(test)]
mod burst {
    use crate::Burst;

    #[test]
    fn emits_count_then_completes() {
        let mut b = Burst::new(3, 0.5).unwrap();
        assert_eq!(b.emit(), Some(0.5));
        assert_eq!(b.emit(), Some(0.5));
        assert_eq!(b.emit(), None);
        assert!(b.is_complete());
        assert_eq!(b.emitted(), 3);
        assert_eq!(b.emit(), None);
        assert_eq!(b.emitted(), 3);
    }

    #[test]
    fn empty_burst_is_complete() {
        assert!(Burst::new(0, 0.5).unwrap().is_complete());
        assert!(Burst::finished().is_complete());
        assert!(Burst::new(2, -1.0).is_err());
    }
}
