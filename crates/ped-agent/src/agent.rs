//! The agent record and its lifecycle state.

use ped_core::cgmath::Zero;

use ped_core::{LineId, NodeId, SpotReservation, Vec2};
use ped_field::Coupling;
use ped_roadmap::{Roadmap, RoadmapResult};

use ped_core::geo::normalize_or_zero;

// ── AgentState ────────────────────────────────────────────────────────────────

/// What an agent is doing at the station.
///
/// A waiting-spot reservation lives inside the states that need one, so an
/// agent holds at most one spot and handing the spot back means moving the
/// reservation out of the state.
///
/// ```text
///  Walking ──► ToWaitingArea ──► ApproachingSpot ──► Waiting
///     │                                                 │
///     └──────────────► PreparingToBoard ◄───────────────┘
///                            │
///                            ▼
///                         Boarded
///
///  Alighting ──(dwell ends)──► Walking
/// ```
#[derive(Debug, PartialEq)]
pub enum AgentState {
    /// Following a path toward an exit goal.
    Walking,
    /// Following a path toward the roadmap node of a reserved waiting area.
    ToWaitingArea(SpotReservation),
    /// Walking straight at the reserved spot inside the area.
    ApproachingSpot(SpotReservation),
    /// Standing on the reserved spot.
    Waiting(SpotReservation),
    /// Selected for the train on `line`; stands still until `moving`.
    PreparingToBoard { line: LineId, moving: bool },
    /// On the train; no longer part of the crowd.
    Boarded { line: LineId },
    /// Leaving a train toward an exit.
    Alighting,
}

impl AgentState {
    pub fn reservation(&self) -> Option<&SpotReservation> {
        match self {
            AgentState::ToWaitingArea(r) | AgentState::ApproachingSpot(r) | AgentState::Waiting(r) => {
                Some(r)
            }
            _ => None,
        }
    }

    /// Move the reservation out, leaving the agent `Walking`.  States without
    /// a reservation are left untouched.
    pub fn take_reservation(&mut self) -> Option<SpotReservation> {
        match std::mem::replace(self, AgentState::Walking) {
            AgentState::ToWaitingArea(r) | AgentState::ApproachingSpot(r) | AgentState::Waiting(r) => {
                Some(r)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Agents that follow the motion model this step.
    pub fn is_moving(&self) -> bool {
        matches!(
            self,
            AgentState::Walking
                | AgentState::ToWaitingArea(_)
                | AgentState::ApproachingSpot(_)
                | AgentState::PreparingToBoard { moving: true, .. }
                | AgentState::Alighting
        )
    }

    /// Agents that stand still but still take up room in the field.
    pub fn is_obstacle(&self) -> bool {
        matches!(
            self,
            AgentState::Waiting(_) | AgentState::PreparingToBoard { moving: false, .. }
        )
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, AgentState::Waiting(_))
    }

    pub fn is_preparing(&self) -> bool {
        matches!(self, AgentState::PreparingToBoard { .. })
    }

    pub fn is_boarded(&self) -> bool {
        matches!(self, AgentState::Boarded { .. })
    }

    pub fn is_alighting(&self) -> bool {
        matches!(self, AgentState::Alighting)
    }

    /// Short label for logs and output rows.
    pub fn label(&self) -> &'static str {
        match self {
            AgentState::Walking => "walking",
            AgentState::ToWaitingArea(_) => "to_waiting_area",
            AgentState::ApproachingSpot(_) => "approaching_spot",
            AgentState::Waiting(_) => "waiting",
            AgentState::PreparingToBoard { .. } => "preparing",
            AgentState::Boarded { .. } => "boarded",
            AgentState::Alighting => "alighting",
        }
    }
}

// ── Navigation ────────────────────────────────────────────────────────────────

/// How the agent picks its preferred direction.
#[derive(Clone, Debug, PartialEq)]
pub enum Navigation {
    /// Follow roadmap nodes; `index` is the node currently aimed at and only
    /// moves forward, up to `nodes.len()` once the path is exhausted.
    Path { nodes: Vec<NodeId>, index: usize },
    /// Head straight for a single point off the roadmap.
    Point(Vec2),
}

impl Navigation {
    /// Node currently aimed at, `None` in point mode or past the end.
    pub fn current_node(&self) -> Option<NodeId> {
        match self {
            Navigation::Path { nodes, index } => nodes.get(*index).copied(),
            Navigation::Point(_) => None,
        }
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Agent {
    pub position: Vec2,
    /// Unit facing direction.
    pub heading: Vec2,

    pub preferred_velocity: Vec2,
    pub continuum_velocity: Vec2,
    /// Displacement requested by local collision handling and edge repulsion.
    /// Consumed and cleared every step.
    pub avoidance_velocity: Vec2,
    pub velocity: Vec2,
    pub walking_speed: f32,

    pub nav: Navigation,
    /// Aim point of the current path node.
    pub target: Vec2,
    /// Final roadmap node of the current trip.
    pub goal: NodeId,
    pub line: Option<LineId>,
    pub state: AgentState,
    /// Set once the current navigation target is reached.
    pub done: bool,

    /// Field weights from the last move; `None` until first computed.
    pub coupling: Option<Coupling>,
    /// `true` while a smoothed turn is in progress.
    pub(crate) turning: bool,
}

impl Agent {
    /// A walking agent at `position` with no navigation yet.
    pub fn new(position: Vec2, walking_speed: f32) -> Self {
        Self {
            position,
            heading: Vec2::new(0.0, 1.0),
            preferred_velocity: Vec2::zero(),
            continuum_velocity: Vec2::zero(),
            avoidance_velocity: Vec2::zero(),
            velocity: Vec2::zero(),
            walking_speed,
            nav: Navigation::Path { nodes: Vec::new(), index: 0 },
            target: position,
            goal: NodeId::INVALID,
            line: None,
            state: AgentState::Walking,
            done: false,
            coupling: None,
            turning: false,
        }
    }

    pub fn with_line(mut self, line: Option<LineId>) -> Self {
        self.line = line;
        self
    }

    pub fn with_state(mut self, state: AgentState) -> Self {
        self.state = state;
        self
    }

    /// Follow the shortest path from `start` to `goal`.
    ///
    /// The first node is skipped when the path has more than one node: the
    /// agent is already standing at (or near) `start`.
    pub fn set_path(&mut self, roadmap: &Roadmap, start: NodeId, goal: NodeId) -> RoadmapResult<()> {
        let nodes = roadmap.shortest_path(start, goal)?;
        self.follow(roadmap, nodes, goal)
    }

    /// Follow an already computed node sequence ending at `goal`.
    pub fn follow(&mut self, roadmap: &Roadmap, nodes: Vec<NodeId>, goal: NodeId) -> RoadmapResult<()> {
        let index = usize::from(nodes.len() > 1);
        if let Some(&node) = nodes.get(index) {
            self.target = roadmap.target_point(node, self.position)?;
        }
        self.preferred_velocity = normalize_or_zero(self.target - self.position);
        self.goal = goal;
        self.nav = Navigation::Path { nodes, index };
        self.done = false;
        self.turning = false;
        Ok(())
    }

    /// Head straight for `point`, bypassing the roadmap.
    pub fn set_point_goal(&mut self, point: Vec2) {
        self.nav = Navigation::Point(point);
        self.target = point;
        self.done = false;
        self.turning = false;
    }

    /// Place the agent at `position` without moving through the field.
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.coupling = None;
    }

    /// Face toward `point` (no-op if standing on it).
    pub fn face(&mut self, point: Vec2) {
        let dir = normalize_or_zero(point - self.position);
        if !dir.is_zero() {
            self.heading = dir;
        }
    }

    /// Clear every velocity term, leaving the agent at rest.
    pub fn reset_motion(&mut self) {
        self.preferred_velocity = Vec2::zero();
        self.continuum_velocity = Vec2::zero();
        self.avoidance_velocity = Vec2::zero();
        self.velocity = Vec2::zero();
        self.turning = false;
    }

    /// Add a displacement request (collision handling, edge repulsion).
    #[inline]
    pub fn push(&mut self, v: Vec2) {
        self.avoidance_velocity += v;
    }
}
