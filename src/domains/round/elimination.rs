use crate::common::{AgentId, DomainError, DomainResult};
use crate::domains::arena::Position2D;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// An unseated live agent as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnseatedAgent {
    pub id: AgentId,
    pub position: Position2D,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elimination {
    pub agent_id: AgentId,
    /// Distance to the nearest seat, present only when several agents were unseated.
    pub nearest_seat_distance: Option<f64>,
}

/// Picks the one agent that leaves the game at the end of a round.
///
/// One unseated agent is simply out. With several, the one whose nearest seat
/// is furthest away goes, and equal distances go to whoever came first.
pub struct EliminationResolver;

impl EliminationResolver {
    pub fn resolve(unseated: &[UnseatedAgent], seat_positions: &[Position2D]) -> DomainResult<Elimination> {
        match unseated {
            [] => Err(DomainError::invariant(
                "round ended with every live agent seated; one seat short guarantees a loser",
            )),
            [only] => Ok(Elimination {
                agent_id: only.id,
                nearest_seat_distance: None,
            }),
            many => {
                let (index, distance) = many
                    .iter()
                    .enumerate()
                    .map(|(index, agent)| (index, Self::nearest_seat_distance(&agent.position, seat_positions)))
                    .max_by_key(|(index, distance)| (OrderedFloat(*distance), Reverse(*index)))
                    .ok_or_else(|| DomainError::invariant("no unseated agents to rank"))?;
                Ok(Elimination {
                    agent_id: many[index].id,
                    nearest_seat_distance: Some(distance),
                })
            }
        }
    }

    /// `f64::INFINITY` when the round had no seats at all.
    fn nearest_seat_distance(from: &Position2D, seat_positions: &[Position2D]) -> f64 {
        seat_positions
            .iter()
            .map(|seat| from.distance_to(seat))
            .fold(f64::INFINITY, f64::min)
    }
}
