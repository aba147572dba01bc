//! Mock MatchHistoryApi implementation for testing

use crate::error::{ClientError, ClientResult};
use crate::traits::MatchHistoryApi;
use crate::types::{
    MatchFilters, MatchSummary, Player, PlayerLookup, QueueType, TableBundle, TableData,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Mock API for testing - only compiled in test mode or with mock feature.
/// Clones share the configured responses and the call log.
#[cfg(any(test, feature = "mock"))]
#[derive(Clone)]
pub struct MockRiotApi {
    responses: Arc<Mutex<MockResponses>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[cfg(any(test, feature = "mock"))]
#[derive(Default)]
struct MockResponses {
    get_player: Option<Box<dyn Fn(&PlayerLookup) -> ClientResult<Option<Player>> + Send>>,
    get_match_history:
        Option<Box<dyn Fn(&str, &MatchFilters, u32) -> ClientResult<Vec<MatchSummary>> + Send>>,
    get_match_details: Option<Box<dyn Fn(i64) -> ClientResult<TableBundle> + Send>>,
    get_timeline: Option<Box<dyn Fn(i64) -> ClientResult<TableBundle> + Send>>,
    get_challenger_leaderboard: Option<Box<dyn Fn(QueueType) -> ClientResult<TableData> + Send>>,
    get_champions: Option<Box<dyn Fn() -> ClientResult<TableData> + Send>>,
    get_queue_types: Option<Box<dyn Fn() -> ClientResult<TableData> + Send>>,
}

#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    GetPlayer {
        lookup: PlayerLookup,
    },
    GetMatchHistory {
        account_id: String,
        filters: MatchFilters,
        limit: u32,
    },
    GetMatchDetails {
        game_id: i64,
    },
    GetTimeline {
        game_id: i64,
    },
    GetChallengerLeaderboard {
        queue: QueueType,
    },
    GetChampions,
    GetQueueTypes,
}

#[cfg(any(test, feature = "mock"))]
impl Default for MockRiotApi {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "mock"))]
impl MockRiotApi {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(MockResponses::default())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure get_player response
    pub fn with_player_response<F>(self, f: F) -> Self
    where
        F: Fn(&PlayerLookup) -> ClientResult<Option<Player>> + Send + 'static,
    {
        self.responses.lock().unwrap().get_player = Some(Box::new(f));
        self
    }

    /// Configure get_match_history response
    pub fn with_match_history_response<F>(self, f: F) -> Self
    where
        F: Fn(&str, &MatchFilters, u32) -> ClientResult<Vec<MatchSummary>> + Send + 'static,
    {
        self.responses.lock().unwrap().get_match_history = Some(Box::new(f));
        self
    }

    /// Configure get_match_details response
    pub fn with_match_details_response<F>(self, f: F) -> Self
    where
        F: Fn(i64) -> ClientResult<TableBundle> + Send + 'static,
    {
        self.responses.lock().unwrap().get_match_details = Some(Box::new(f));
        self
    }

    /// Configure get_timeline response
    pub fn with_timeline_response<F>(self, f: F) -> Self
    where
        F: Fn(i64) -> ClientResult<TableBundle> + Send + 'static,
    {
        self.responses.lock().unwrap().get_timeline = Some(Box::new(f));
        self
    }

    /// Configure get_challenger_leaderboard response
    pub fn with_leaderboard_response<F>(self, f: F) -> Self
    where
        F: Fn(QueueType) -> ClientResult<TableData> + Send + 'static,
    {
        self.responses.lock().unwrap().get_challenger_leaderboard = Some(Box::new(f));
        self
    }

    /// Configure get_champions response
    pub fn with_champions_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<TableData> + Send + 'static,
    {
        self.responses.lock().unwrap().get_champions = Some(Box::new(f));
        self
    }

    /// Configure get_queue_types response
    pub fn with_queue_types_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<TableData> + Send + 'static,
    {
        self.responses.lock().unwrap().get_queue_types = Some(Box::new(f));
        self
    }

    /// Get recorded calls for verification
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear call history
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl MatchHistoryApi for MockRiotApi {
    async fn get_player(&self, lookup: &PlayerLookup) -> ClientResult<Option<Player>> {
        self.call_log.lock().unwrap().push(MockCall::GetPlayer {
            lookup: lookup.clone(),
        });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_player {
            f(lookup)
        } else {
            Err(ClientError::NotConfigured("get_player".to_string()))
        }
    }

    async fn get_match_history(
        &self,
        account_id: &str,
        filters: &MatchFilters,
        limit: u32,
    ) -> ClientResult<Vec<MatchSummary>> {
        self.call_log
            .lock()
            .unwrap()
            .push(MockCall::GetMatchHistory {
                account_id: account_id.to_string(),
                filters: filters.clone(),
                limit,
            });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_match_history {
            f(account_id, filters, limit)
        } else {
            Err(ClientError::NotConfigured("get_match_history".to_string()))
        }
    }

    async fn get_match_details(&self, game_id: i64) -> ClientResult<TableBundle> {
        self.call_log
            .lock()
            .unwrap()
            .push(MockCall::GetMatchDetails { game_id });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_match_details {
            f(game_id)
        } else {
            Err(ClientError::NotConfigured("get_match_details".to_string()))
        }
    }

    async fn get_timeline(&self, game_id: i64) -> ClientResult<TableBundle> {
        self.call_log
            .lock()
            .unwrap()
            .push(MockCall::GetTimeline { game_id });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_timeline {
            f(game_id)
        } else {
            Err(ClientError::NotConfigured("get_timeline".to_string()))
        }
    }

    async fn get_challenger_leaderboard(&self, queue: QueueType) -> ClientResult<TableData> {
        self.call_log
            .lock()
            .unwrap()
            .push(MockCall::GetChallengerLeaderboard { queue });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_challenger_leaderboard {
            f(queue)
        } else {
            Err(ClientError::NotConfigured(
                "get_challenger_leaderboard".to_string(),
            ))
        }
    }

    async fn get_champions(&self) -> ClientResult<TableData> {
        self.call_log.lock().unwrap().push(MockCall::GetChampions);

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_champions {
            f()
        } else {
            Err(ClientError::NotConfigured("get_champions".to_string()))
        }
    }

    async fn get_queue_types(&self) -> ClientResult<TableData> {
        self.call_log.lock().unwrap().push(MockCall::GetQueueTypes);

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.get_queue_types {
            f()
        } else {
            Err(ClientError::NotConfigured("get_queue_types".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_method_errors() {
        let mock = MockRiotApi::new();
        let result = mock.get_match_details(42).await;
        assert!(matches!(result, Err(ClientError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_call_log_records_arguments() {
        let mock = MockRiotApi::new().with_match_details_response(|_| Ok(TableBundle::new()));
        mock.get_match_details(42).await.unwrap();
        assert_eq!(
            mock.get_calls(),
            vec![MockCall::GetMatchDetails { game_id: 42 }]
        );
    }
}
