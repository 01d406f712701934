//! Telemetry messages published by the game after a round ends.

use serde::{Deserialize, Serialize};

/// Broker topic game results are published to.
pub const GAME_RESULT_TOPIC: &str = "monster-chaos-game/monster";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResult {
    Won,
    Failed,
}

/// Device payload, e.g. `{"game_result":"FAILED"}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResultPayload {
    pub game_result: GameResult,
}

impl GameResultPayload {
    pub const fn new(game_result: GameResult) -> Self {
        Self { game_result }
    }

    pub const fn failed() -> Self {
        Self::new(GameResult::Failed)
    }
}

/// A payload addressed to a topic, as written by line-oriented sinks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub topic: String,
    pub payload: GameResultPayload,
}

impl Envelope {
    pub fn game_result(game_result: GameResult) -> Self {
        Self {
            topic: GAME_RESULT_TOPIC.to_owned(),
            payload: GameResultPayload::new(game_result),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
