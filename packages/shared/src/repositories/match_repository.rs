use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::models::matches::Match;
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;

#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError>;

    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchRepositoryError>;

    async fn update_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError>;

    async fn find_active_for_player(
        &self,
        player_id: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError>;
}

pub struct DynamoDbMatchRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbMatchRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("MATCHES_TABLE")
            .expect("MATCHES_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl MatchRepository for DynamoDbMatchRepository {
    async fn create_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError> {
        let item = serde_dynamo::to_item(game_match)
            .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(match_id.to_string()))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            let game_match: Match = serde_dynamo::from_item(item)
                .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(game_match))
        } else {
            Ok(None)
        }
    }

    async fn update_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError> {
        let item = serde_dynamo::to_item(game_match)
            .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(id)")
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn find_active_for_player(
        &self,
        player_id: &str,
    ) -> Result<Vec<Match>, MatchRepositoryError> {
        // Status is a tagged enum in storage, so completion is filtered in
        // code after deserializing rather than in the filter expression.
        let scan_result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("player1_id = :player_id OR player2_id = :player_id")
            .expression_attribute_values(":player_id", AttributeValue::S(player_id.to_string()))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        let mut matches = Vec::new();

        if let Some(items) = scan_result.items {
            for item in items {
                let game_match: Match = serde_dynamo::from_item(item)
                    .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

                if game_match.winner().is_none() {
                    matches.push(game_match);
                }
            }
        }

        matches.sort_by_key(|m| m.created_at);

        Ok(matches)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // In-memory repository for service tests
    pub struct MockMatchRepository {
        pub matches: Mutex<HashMap<String, Match>>,
    }

    impl MockMatchRepository {
        pub fn new() -> Self {
            Self {
                matches: Mutex::new(HashMap::new()),
            }
        }

        pub fn with_match(self, game_match: Match) -> Self {
            self.matches
                .lock()
                .unwrap()
                .insert(game_match.id.clone(), game_match);
            self
        }
    }

    #[async_trait]
    impl MatchRepository for MockMatchRepository {
        async fn create_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError> {
            self.matches
                .lock()
                .unwrap()
                .insert(game_match.id.clone(), game_match.clone());
            Ok(())
        }

        async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchRepositoryError> {
            Ok(self.matches.lock().unwrap().get(match_id).cloned())
        }

        async fn update_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError> {
            self.matches
                .lock()
                .unwrap()
                .insert(game_match.id.clone(), game_match.clone());
            Ok(())
        }

        async fn find_active_for_player(
            &self,
            player_id: &str,
        ) -> Result<Vec<Match>, MatchRepositoryError> {
            let mut matches: Vec<Match> = self
                .matches
                .lock()
                .unwrap()
                .values()
                .filter(|m| m.is_participant(player_id))
                .filter(|m| m.winner().is_none())
                .cloned()
                .collect();

            matches.sort_by_key(|m| m.created_at);

            Ok(matches)
        }
    }
}
