//! Unit tests for ped-station.

#[cfg(test)]
mod helpers {
    use ped_agent::{Agent, AgentState, AgentStore, PlatformType};
    use ped_core::{AgentId, LineId, NodeId, SimRng, SimTime, Vec2};
    use ped_roadmap::{NodeShape, OpenFloor, Roadmap, RoadmapBuilder};

    use crate::{
        AllocatorWeights, LineConfig, LineTiming, Station, StationConfig, StationContext, WaitingAreaConfig,
    };

    pub struct Nodes {
        pub area1: NodeId,
        pub area2: NodeId,
        pub door1: NodeId,
        pub exit: NodeId,
        pub island: NodeId,
    }

    /// Hub at the origin with spokes to a spawn, two waiting areas, one door
    /// per line and an exit.  `island` is not linked to anything.
    pub fn platform() -> (Roadmap, Nodes) {
        let mut b = RoadmapBuilder::new();
        let shape = NodeShape::default();
        let spawn = b.add_node(Vec2::new(0.0, -20.0), shape);
        let hub = b.add_node(Vec2::new(0.0, 0.0), shape);
        let area1 = b.add_node(Vec2::new(3.0, 5.0), shape);
        let area2 = b.add_node(Vec2::new(-3.0, 5.0), shape);
        let door1 = b.add_node(Vec2::new(8.0, 0.0), shape);
        let door2 = b.add_node(Vec2::new(-8.0, 0.0), shape);
        let exit = b.add_node(Vec2::new(0.0, 20.0), shape);
        let island = b.add_node(Vec2::new(50.0, 50.0), shape);
        for n in [spawn, area1, area2, door1, door2, exit] {
            b.link(hub, n);
        }
        b.mark_spawn(spawn).mark_goal(exit);
        (b.build().unwrap(), Nodes { area1, area2, door1, exit, island })
    }

    /// Two 2 m × 1 m areas (8 spots each), only line 1 operated.
    pub fn station(map: &Roadmap, n: &Nodes, timing: LineTiming) -> Station {
        let config = StationConfig {
            platform: PlatformType::Mixed,
            allocator: AllocatorWeights::default(),
            areas: vec![
                WaitingAreaConfig::new(n.area1, [2.0, 1.0]),
                WaitingAreaConfig::new(n.area2, [2.0, 1.0]),
            ],
            lines: vec![LineConfig::new(LineId(1), vec![n.door1]).with_timing(timing)],
        };
        Station::new(config, map).unwrap()
    }

    pub fn timing() -> LineTiming {
        LineTiming {
            arrival_interval_secs: 1.0,
            dwell_secs: 5.0,
            passengers: 0,
            ..LineTiming::default()
        }
    }

    pub fn ctx<'a>(
        now: SimTime,
        agents: &'a mut AgentStore,
        map: &'a Roadmap,
        rng: &'a mut SimRng,
    ) -> StationContext<'a, OpenFloor> {
        StationContext { now, agents, roadmap: map, sight: &OpenFloor, rng, speed_range: (1.0, 1.5) }
    }

    /// An agent of `line` standing on a freshly reserved spot.
    pub fn waiting_agent(
        station: &mut Station,
        agents: &mut AgentStore,
        map: &Roadmap,
        rng: &mut SimRng,
        line: LineId,
    ) -> AgentId {
        let spawn = map.spawns[0];
        let (_, res) = station.allocate(spawn, map.position(spawn).unwrap(), line, true, rng).unwrap();
        let pos = station.spot_position(&res).unwrap();
        agents.insert(Agent::new(pos, 1.2).with_line(Some(line)).with_state(AgentState::Waiting(res)))
    }

    pub fn count(agents: &AgentStore, pred: impl Fn(&AgentState) -> bool) -> usize {
        agents.count_where(|a| pred(&a.state))
    }
}

#[cfg(test)]
mod waiting {
    use ped_core::{AreaId, NodeId, SimRng, SpotReservation, Vec2};

    use crate::{SpotLayout, StationError, WaitingArea, WaitingAreaConfig};

    fn area(layout: SpotLayout) -> WaitingArea {
        let cfg = WaitingAreaConfig::new(NodeId(0), [2.0, 1.0]).with_layout(layout);
        WaitingArea::new(AreaId(0), Vec2::new(10.0, 0.0), &cfg).unwrap()
    }

    #[test]
    fn packed_spots_fill_rectangle() {
        let a = area(SpotLayout::default());
        assert_eq!(a.total(), 8);
        assert_eq!(a.spot(0), Some(Vec2::new(9.25, -0.25)));
        assert_eq!(a.spot(7), Some(Vec2::new(10.75, 0.25)));
    }

    #[test]
    fn grid_spots_stretch() {
        let a = area(SpotLayout::Grid { rows: 1, cols: 2 });
        assert_eq!(a.spots(), &[Vec2::new(9.5, 0.0), Vec2::new(10.5, 0.0)]);
    }

    #[test]
    fn empty_layout_is_rejected() {
        let cfg = WaitingAreaConfig::new(NodeId(0), [0.2, 0.2]);
        let r = WaitingArea::new(AreaId(3), Vec2::new(0.0, 0.0), &cfg);
        assert!(matches!(r, Err(StationError::InvalidArea { area: AreaId(3), .. })));
    }

    #[test]
    fn reserve_until_full() {
        let mut a = area(SpotLayout::Grid { rows: 1, cols: 3 });
        let mut rng = SimRng::new(1);
        let mut held = Vec::new();
        while let Some(r) = a.reserve(&mut rng) {
            assert!(a.is_occupied(r.spot()));
            held.push(r);
            assert!(a.is_consistent());
        }
        assert_eq!(held.len(), 3);
        assert!(!a.has_free());
        assert_eq!(a.occupancy(), 1.0);
        let mut spots: Vec<_> = held.iter().map(|r| r.spot()).collect();
        spots.sort_unstable();
        assert_eq!(spots, vec![0, 1, 2]);

        for r in held {
            a.release(r).unwrap();
            assert!(a.is_consistent());
        }
        assert_eq!(a.free_count(), 3);
        assert_eq!(a.occupied_count(), 0);
    }

    #[test]
    fn forged_second_release_is_refused() {
        let mut a = area(SpotLayout::default());
        let mut rng = SimRng::new(2);
        let r = a.reserve(&mut rng).unwrap();
        let spot = r.spot();
        a.release(r).unwrap();
        let forged = SpotReservation::issue(AreaId(0), spot);
        assert!(matches!(a.release(forged), Err(StationError::SpotNotOccupied(_))));
        assert!(a.is_consistent());
        assert_eq!(a.free_count(), 8);
    }

    #[test]
    fn foreign_reservation_is_refused() {
        let mut a = area(SpotLayout::default());
        let r = SpotReservation::issue(AreaId(9), 0);
        assert!(matches!(a.release(r), Err(StationError::UnknownArea(_))));
    }

    #[test]
    fn random_churn_keeps_pool_consistent() {
        let mut a = area(SpotLayout::default());
        let mut rng = SimRng::new(7);
        let mut held = Vec::new();
        for i in 0..200 {
            if i % 3 == 2 && !held.is_empty() {
                let k = rng.gen_range(0..held.len());
                a.release(held.swap_remove(k)).unwrap();
            } else if let Some(r) = a.reserve(&mut rng) {
                held.push(r);
            }
            assert!(a.is_consistent());
            assert_eq!(a.occupied_count(), held.len());
        }
    }
}

#[cfg(test)]
mod allocator {
    use ped_core::{AreaId, LineId, NodeId, SimRng, Vec2};

    use crate::{AllocatorWeights, WaitingArea, WaitingAreaAllocator, WaitingAreaConfig};

    fn areas(positions: &[(f32, f32)], size: [f32; 2]) -> Vec<WaitingArea> {
        positions
            .iter()
            .enumerate()
            .map(|(i, &(x, z))| {
                let cfg = WaitingAreaConfig::new(NodeId(100 + i as u32), size);
                WaitingArea::new(AreaId(i as u32), Vec2::new(x, z), &cfg).unwrap()
            })
            .collect()
    }

    const ORIGIN: NodeId = NodeId(0);

    fn origin_pos() -> Vec2 {
        Vec2::new(0.0, 0.0)
    }

    #[test]
    fn far_matching_side_beats_near_mismatch() {
        // A: 100/150 + 0.1 ≈ 0.767, B: 1/150 + 1 + 0.1 ≈ 1.107
        let alloc = WaitingAreaAllocator::new(
            areas(&[(100.0, 0.0), (-1.0, 0.0)], [1.0, 1.0]),
            AllocatorWeights::default(),
            [(ORIGIN, origin_pos())],
        );
        assert_eq!(alloc.best_area(ORIGIN, origin_pos(), LineId(1), false), Some(AreaId(0)));

        let light = AllocatorWeights { line: 0.1, ..AllocatorWeights::default() };
        let alloc = WaitingAreaAllocator::new(
            areas(&[(100.0, 0.0), (-1.0, 0.0)], [1.0, 1.0]),
            light,
            [(ORIGIN, origin_pos())],
        );
        assert_eq!(alloc.best_area(ORIGIN, origin_pos(), LineId(1), false), Some(AreaId(1)));
    }

    #[test]
    fn choice_is_minimum_score() {
        let mut alloc = WaitingAreaAllocator::new(
            areas(&[(5.0, 0.0), (20.0, 3.0), (-4.0, 1.0), (1.0, -30.0)], [1.0, 1.0]),
            AllocatorWeights { distance: 3.0, density: 0.5, line: 0.4, priority: 1.0 },
            [(ORIGIN, origin_pos())],
        );
        let mut rng = SimRng::new(4);
        // Fill half of area 0 to make density count.
        for _ in 0..2 {
            alloc.allocate(ORIGIN, origin_pos(), LineId(1), false, &mut rng).unwrap();
        }
        for line in [LineId(1), LineId(2)] {
            let expected = alloc
                .areas()
                .iter()
                .filter_map(|a| alloc.score(a, ORIGIN, origin_pos(), line, false).map(|s| (s, a.id)))
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, id)| id);
            assert_eq!(alloc.best_area(ORIGIN, origin_pos(), line, false), expected);
        }
    }

    #[test]
    fn score_matches_formula() {
        let alloc = WaitingAreaAllocator::new(
            areas(&[(-30.0, 40.0)], [1.0, 1.0]),
            AllocatorWeights { distance: 2.0, density: 1.0, line: 0.5, priority: 3.0 },
            [(ORIGIN, origin_pos())],
        );
        let a = &alloc.areas()[0];
        let s = alloc.score(a, ORIGIN, origin_pos(), LineId(1), false).unwrap();
        let expected = 2.0 * 50.0 / 150.0 + 0.0 + 0.5 * 1.0 + 3.0 * 1.0 * 0.1;
        assert!((s - expected).abs() < 1e-5, "{s} vs {expected}");
    }

    #[test]
    fn force_line_excludes_other_side() {
        let mut alloc = WaitingAreaAllocator::new(
            areas(&[(-1.0, 0.0), (120.0, 0.0)], [1.0, 1.0]),
            AllocatorWeights { line: 0.0, ..AllocatorWeights::default() },
            [(ORIGIN, origin_pos())],
        );
        let mut rng = SimRng::new(1);
        assert_eq!(alloc.best_area(ORIGIN, origin_pos(), LineId(1), false), Some(AreaId(0)));
        let (node, res) = alloc.allocate(ORIGIN, origin_pos(), LineId(1), true, &mut rng).unwrap();
        assert_eq!(node, NodeId(101));
        assert_eq!(res.area(), AreaId(1));

        // Only mismatched areas have room left.
        let mut alloc = WaitingAreaAllocator::new(
            areas(&[(-1.0, 0.0)], [1.0, 1.0]),
            AllocatorWeights::default(),
            [(ORIGIN, origin_pos())],
        );
        assert!(alloc.allocate(ORIGIN, origin_pos(), LineId(1), true, &mut rng).is_none());
        assert!(alloc.is_consistent());
        assert_eq!(alloc.occupied_spots(), 0);
    }

    #[test]
    fn ties_keep_first_area() {
        let alloc = WaitingAreaAllocator::new(
            areas(&[(3.0, 4.0), (3.0, -4.0)], [1.0, 1.0]),
            AllocatorWeights::default(),
            [(ORIGIN, origin_pos())],
        );
        assert_eq!(alloc.best_area(ORIGIN, origin_pos(), LineId(1), false), Some(AreaId(0)));
    }

    #[test]
    fn single_spot_goes_to_first_requester() {
        let mut alloc = WaitingAreaAllocator::new(
            areas(&[(2.0, 0.0)], [0.5, 0.5]),
            AllocatorWeights::default(),
            [(ORIGIN, origin_pos())],
        );
        let mut rng = SimRng::new(3);
        assert_eq!(alloc.areas()[0].total(), 1);
        let first = alloc.allocate(ORIGIN, origin_pos(), LineId(1), false, &mut rng);
        assert!(first.is_some());
        assert!(alloc.areas()[0].is_occupied(0));
        assert!(alloc.allocate(ORIGIN, origin_pos(), LineId(1), false, &mut rng).is_none());

        let (_, res) = first.unwrap();
        alloc.release(res).unwrap();
        assert!(alloc.allocate(ORIGIN, origin_pos(), LineId(1), false, &mut rng).is_some());
    }

    #[test]
    fn unknown_origin_uses_straight_line() {
        let alloc = WaitingAreaAllocator::new(
            areas(&[(6.0, 8.0)], [1.0, 1.0]),
            AllocatorWeights::default(),
            [(ORIGIN, Vec2::new(100.0, 100.0))],
        );
        let a = &alloc.areas()[0];
        assert!((alloc.distance(NodeId(42), origin_pos(), a) - 10.0).abs() < 1e-5);
        assert!(alloc.distance(ORIGIN, origin_pos(), a) > 100.0);
    }
}

#[cfg(test)]
mod line {
    use ped_agent::{Agent, AgentState, AgentStore};
    use ped_core::{LineId, SimRng, SimTime, Vec2};

    use super::helpers::{count, ctx, platform, station, timing, waiting_agent};
    use crate::{LinePhase, LineTiming, StationError, StationEvent, StationTask};

    #[test]
    fn capacity_limits_preparing_agents() {
        let (map, n) = platform();
        let mut st = station(&map, &n, LineTiming { limit_capacity: true, capacity: 2, ..timing() });
        let mut agents = AgentStore::new();
        let mut rng = SimRng::new(5);
        for _ in 0..3 {
            waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(1));
        }
        assert_eq!(st.allocator().occupied_spots(), 3);

        let out = st.update(1.0, &mut ctx(SimTime(1_000), &mut agents, &map, &mut rng));
        assert!(out.events.contains(&StationEvent::TrainArrived { line: LineId(1) }));
        assert_eq!(count(&agents, |s| s.is_preparing()), 2);
        assert_eq!(count(&agents, |s| s.is_waiting()), 1);
        assert_eq!(st.allocator().occupied_spots(), 1);
        assert!(st.allocator().is_consistent());
        assert_eq!(st.line(LineId(1)).unwrap().boarded_count(), 2);
    }

    #[test]
    fn unlimited_capacity_takes_everyone() {
        let (map, n) = platform();
        let mut st = station(&map, &n, LineTiming { capacity: 2, ..timing() });
        let mut agents = AgentStore::new();
        let mut rng = SimRng::new(5);
        for _ in 0..3 {
            waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(1));
        }
        st.update(1.0, &mut ctx(SimTime(1_000), &mut agents, &map, &mut rng));
        assert_eq!(count(&agents, |s| s.is_preparing()), 3);
        assert_eq!(st.allocator().occupied_spots(), 0);
    }

    #[test]
    fn waiting_agents_go_first() {
        let (map, n) = platform();
        let mut st = station(&map, &n, LineTiming { limit_capacity: true, capacity: 1, ..timing() });
        let mut agents = AgentStore::new();
        let mut rng = SimRng::new(5);
        let walker = agents.insert(Agent::new(Vec2::new(0.0, -10.0), 1.2).with_line(Some(LineId(1))));
        let waiter = waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(1));

        st.update(1.0, &mut ctx(SimTime(1_000), &mut agents, &map, &mut rng));
        assert!(agents.get(waiter).unwrap().state.is_preparing());
        assert_eq!(agents.get(walker).unwrap().state, AgentState::Walking);
    }

    #[test]
    fn other_lines_and_unreachable_agents_are_skipped() {
        let (map, n) = platform();
        let mut st = station(&map, &n, timing());
        let mut agents = AgentStore::new();
        let mut rng = SimRng::new(5);
        let other = waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(2));
        let stray_pos = map.position(n.island).unwrap();
        let stray = agents.insert(Agent::new(stray_pos, 1.2).with_line(Some(LineId(1))));
        let alighting = agents.insert(
            Agent::new(Vec2::new(7.0, 0.0), 1.2).with_line(Some(LineId(1))).with_state(AgentState::Alighting),
        );

        st.update(1.0, &mut ctx(SimTime(1_000), &mut agents, &map, &mut rng));
        assert!(agents.get(other).unwrap().state.is_waiting());
        assert_eq!(agents.get(stray).unwrap().state, AgentState::Walking);
        assert!(agents.get(alighting).unwrap().state.is_alighting());
        assert_eq!(st.line(LineId(1)).unwrap().boarded_count(), 0);
    }

    #[test]
    fn preparing_agent_routes_to_door() {
        let (map, n) = platform();
        let mut st = station(&map, &n, timing());
        let mut agents = AgentStore::new();
        let mut rng = SimRng::new(5);
        let id = waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(1));

        let out = st.update(1.0, &mut ctx(SimTime(1_000), &mut agents, &map, &mut rng));
        let agent = agents.get(id).unwrap();
        assert_eq!(agent.goal, n.door1);
        assert_eq!(agent.state, AgentState::PreparingToBoard { line: LineId(1), moving: false });
        assert!(out.scheduled.iter().any(|s| s.task == StationTask::BeginApproach { agent: id }));
        // No passengers to let off, so boarding is scheduled right away.
        assert!(out.scheduled.iter().any(|s| s.task == StationTask::Board { agent: id, line: LineId(1) }));
        assert_eq!(st.line(LineId(1)).unwrap().phase(), LinePhase::Boarding);
        assert_eq!(st.edges().dwelling, vec![LineId(1)]);

        st.run_task(StationTask::BeginApproach { agent: id }, &mut ctx(SimTime(1_500), &mut agents, &map, &mut rng));
        assert!(agents.get(id).unwrap().state.is_moving());

        let out = st.run_task(
            StationTask::Board { agent: id, line: LineId(1) },
            &mut ctx(SimTime(2_000), &mut agents, &map, &mut rng),
        );
        assert_eq!(out.events, vec![StationEvent::Boarded { agent: id, line: LineId(1) }]);
        let agent = agents.get(id).unwrap();
        assert!(agent.state.is_boarded());
        assert!(agent.coupling.is_none());
    }

    #[test]
    fn arrival_waits_for_enough_agents() {
        let (map, n) = platform();
        let mut st = station(&map, &n, LineTiming { min_active_agents: 2, ..timing() });
        let mut agents = AgentStore::new();
        let mut rng = SimRng::new(5);
        let out = st.update(2.0, &mut ctx(SimTime(2_000), &mut agents, &map, &mut rng));
        assert!(out.is_empty());
        assert_eq!(st.line(LineId(1)).unwrap().phase(), LinePhase::Idle);

        for _ in 0..2 {
            waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(1));
        }
        st.update(0.05, &mut ctx(SimTime(2_050), &mut agents, &map, &mut rng));
        assert!(st.line(LineId(1)).unwrap().is_dwelling());
    }

    #[test]
    fn alighting_bursts_gate_boarding() {
        let (map, n) = platform();
        let mut st = station(&map, &n, LineTiming { passengers: 3, ..timing() });
        let mut agents = AgentStore::new();
        let mut rng = SimRng::new(9);
        waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(1));

        let mut now = SimTime(1_000);
        let mut pending = st.update(1.0, &mut ctx(now, &mut agents, &map, &mut rng)).scheduled;
        assert_eq!(st.line(LineId(1)).unwrap().phase(), LinePhase::PreparingToBoard);

        let mut alighted = 0;
        while let Some(pos) = pending.iter().position(|s| matches!(s.task, StationTask::AlightBurst { .. })) {
            let next = pending.remove(pos);
            now = next.at;
            let out = st.run_task(next.task, &mut ctx(now, &mut agents, &map, &mut rng));
            alighted += out.events.iter().filter(|e| matches!(e, StationEvent::Alighted { .. })).count();
            pending.extend(out.scheduled);
        }
        assert_eq!(alighted, 3);
        assert_eq!(now, SimTime(2_000));
        assert_eq!(count(&agents, |s| s.is_alighting()), 3);
        for (_, a) in agents.iter().filter(|(_, a)| a.state.is_alighting()) {
            assert_eq!(a.goal, n.exit);
            assert!((a.position.x - 8.0).abs() <= 1.5 && a.position.y.abs() <= 1.5);
        }

        st.update(0.0, &mut ctx(now, &mut agents, &map, &mut rng));
        assert_eq!(st.line(LineId(1)).unwrap().phase(), LinePhase::Boarding);
    }

    #[test]
    fn departure_sweeps_the_line() {
        let (map, n) = platform();
        let mut st = station(&map, &n, LineTiming { passengers: 1, alight_before_boarding: false, ..timing() });
        let mut agents = AgentStore::new();
        let mut rng = SimRng::new(11);
        let stuck = waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(1));
        let rider = waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(1));
        let bystander = waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(2));

        let out = st.update(1.0, &mut ctx(SimTime(1_000), &mut agents, &map, &mut rng));
        assert_eq!(st.allocator().occupied_spots(), 1);
        let alight = out
            .scheduled
            .iter()
            .find(|s| matches!(s.task, StationTask::AlightBurst { .. }))
            .unwrap();
        st.run_task(alight.task, &mut ctx(SimTime(1_000), &mut agents, &map, &mut rng));
        st.run_task(
            StationTask::Board { agent: rider, line: LineId(1) },
            &mut ctx(SimTime(2_000), &mut agents, &map, &mut rng),
        );

        let out = st.update(4.0, &mut ctx(SimTime(5_000), &mut agents, &map, &mut rng));
        assert!(out.events.contains(&StationEvent::TrainDeparted { line: LineId(1), departed: 1, stranded: 1 }));
        assert!(!agents.contains(stuck));
        assert!(!agents.contains(rider));
        assert!(agents.get(bystander).unwrap().state.is_waiting());
        assert_eq!(st.allocator().occupied_spots(), 1);
        assert!(st.allocator().is_consistent());

        let (_, released) = agents.iter().find(|(id, _)| *id != bystander).unwrap();
        assert_eq!(released.state, AgentState::Walking);
        assert_eq!(released.line, None);
        assert_eq!(released.velocity, Vec2::new(0.0, 0.0));

        let line = st.line(LineId(1)).unwrap();
        assert_eq!(line.phase(), LinePhase::Idle);
        assert!(!line.is_dwelling());
        assert_eq!(line.boarded_count(), 0);
        assert!(st.edges().dwelling.is_empty());
    }

    #[test]
    fn stale_tasks_are_ignored() {
        let (map, n) = platform();
        let mut st = station(&map, &n, timing());
        let mut agents = AgentStore::new();
        let mut rng = SimRng::new(2);
        let id = waiting_agent(&mut st, &mut agents, &map, &mut rng, LineId(1));
        st.update(1.0, &mut ctx(SimTime(1_000), &mut agents, &map, &mut rng));
        st.update(4.0, &mut ctx(SimTime(5_000), &mut agents, &map, &mut rng));
        assert!(!agents.contains(id));

        for task in [
            StationTask::BeginApproach { agent: id },
            StationTask::Board { agent: id, line: LineId(1) },
            StationTask::AlightBurst { line: LineId(1), door: 0, cycle: 1 },
            StationTask::AlightBurst { line: LineId(7), door: 3, cycle: 1 },
        ] {
            let out = st.run_task(task, &mut ctx(SimTime(5_100), &mut agents, &map, &mut rng));
            assert!(out.is_empty());
        }
        assert!(agents.is_empty());
    }

    #[test]
    fn bursts_of_a_departed_train_do_not_leak_into_the_next() {
        let (map, n) = platform();
        let timing = LineTiming { passengers: 2, dwell_secs: 1.5, alight_before_boarding: false, ..timing() };
        let mut st = station(&map, &n, timing);
        let mut agents = AgentStore::new();
        let mut rng = SimRng::new(4);

        let first = st.update(1.0, &mut ctx(SimTime(1_000), &mut agents, &map, &mut rng));
        let burst = first.scheduled.iter().find(|s| matches!(s.task, StationTask::AlightBurst { .. })).unwrap();
        let out = st.run_task(burst.task, &mut ctx(SimTime(1_000), &mut agents, &map, &mut rng));
        let [leftover] = out.scheduled.as_slice() else { panic!("expected one follow-up burst") };

        // Departs with one passenger still aboard, then the next train arrives.
        st.update(1.0, &mut ctx(SimTime(2_000), &mut agents, &map, &mut rng));
        assert!(!st.line(LineId(1)).unwrap().is_dwelling());
        let second = st.update(1.0, &mut ctx(SimTime(3_000), &mut agents, &map, &mut rng));
        assert_eq!(st.line(LineId(1)).unwrap().cycle(), 2);

        let out = st.run_task(leftover.task, &mut ctx(SimTime(3_000), &mut agents, &map, &mut rng));
        assert!(out.is_empty());

        let fresh = second.scheduled.iter().find(|s| matches!(s.task, StationTask::AlightBurst { .. })).unwrap();
        assert_eq!(fresh.task, StationTask::AlightBurst { line: LineId(1), door: 0, cycle: 2 });
        let out = st.run_task(fresh.task, &mut ctx(SimTime(3_000), &mut agents, &map, &mut rng));
        assert_eq!(out.events.iter().filter(|e| matches!(e, StationEvent::Alighted { .. })).count(), 1);
        assert_eq!(out.scheduled.len(), 1);
    }

    #[test]
    fn board_requires_matching_line() {
        let mut agents = AgentStore::new();
        let id = agents.insert(
            Agent::new(Vec2::new(0.0, 0.0), 1.0)
                .with_state(AgentState::PreparingToBoard { line: LineId(2), moving: true }),
        );
        assert!(crate::board(id, LineId(1), &mut agents).is_none());
        assert!(crate::board(id, LineId(2), &mut agents).is_some());
        assert!(crate::board(id, LineId(2), &mut agents).is_none());
    }

    #[test]
    fn config_errors() {
        let (map, n) = platform();
        let no_doors = crate::StationConfig {
            lines: vec![crate::LineConfig::new(LineId(1), vec![])],
            ..Default::default()
        };
        assert!(matches!(crate::Station::new(no_doors, &map), Err(StationError::NoDoors(LineId(1)))));

        let twice = crate::StationConfig {
            lines: vec![
                crate::LineConfig::new(LineId(1), vec![n.door1]),
                crate::LineConfig::new(LineId(1), vec![n.door1]),
            ],
            ..Default::default()
        };
        assert!(matches!(crate::Station::new(twice, &map), Err(StationError::DuplicateLine(LineId(1)))));

        let bad_area = crate::StationConfig {
            areas: vec![crate::WaitingAreaConfig::new(ped_core::NodeId(99), [1.0, 1.0])],
            ..Default::default()
        };
        assert!(matches!(crate::Station::new(bad_area, &map), Err(StationError::UnknownNode(_))));
    }
}
