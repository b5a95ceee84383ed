use std::collections::HashSet;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Put, TransactWriteItem};
use aws_sdk_dynamodb::Client;

use crate::models::game::Game;
use crate::models::game_move::GameMove;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError>;

    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, GameRepositoryError>;

    async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError>;

    /// Persist an updated game together with one new move log entry. The two
    /// writes must land atomically: a move is never logged against a game
    /// state it did not produce.
    async fn apply_move(&self, game: &Game, game_move: &GameMove)
        -> Result<(), GameRepositoryError>;

    /// The game's move log, ordered by move number.
    async fn find_moves(&self, game_id: &str) -> Result<Vec<GameMove>, GameRepositoryError>;

    /// Answer ids consumed by non-Invalid moves in this game.
    async fn used_answer_ids(&self, game_id: &str) -> Result<HashSet<String>, GameRepositoryError>;

    async fn find_by_match(&self, match_id: &str) -> Result<Vec<Game>, GameRepositoryError>;

    async fn count_completed(&self, match_id: &str) -> Result<u32, GameRepositoryError>;

    async fn find_in_progress_by_match(
        &self,
        match_id: &str,
    ) -> Result<Option<Game>, GameRepositoryError>;
}

pub struct DynamoDbGameRepository {
    pub client: Client,
    pub games_table: String,
    pub moves_table: String,
}

impl DynamoDbGameRepository {
    pub fn new(client: Client) -> Self {
        let games_table =
            std::env::var("GAMES_TABLE").expect("GAMES_TABLE environment variable must be set");
        let moves_table = std::env::var("GAME_MOVES_TABLE")
            .expect("GAME_MOVES_TABLE environment variable must be set");
        Self {
            client,
            games_table,
            moves_table,
        }
    }
}

#[async_trait]
impl GameRepository for DynamoDbGameRepository {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let item = serde_dynamo::to_item(game)
            .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.games_table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn get_game(&self, game_id: &str) -> Result<Option<Game>, GameRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.games_table)
            .key("id", AttributeValue::S(game_id.to_string()))
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            let game: Game = serde_dynamo::from_item(item)
                .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(game))
        } else {
            Ok(None)
        }
    }

    async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let item = serde_dynamo::to_item(game)
            .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.games_table)
            .set_item(Some(item))
            .condition_expression("attribute_exists(id)")
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn apply_move(
        &self,
        game: &Game,
        game_move: &GameMove,
    ) -> Result<(), GameRepositoryError> {
        let game_item = serde_dynamo::to_item(game)
            .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
        let move_item = serde_dynamo::to_item(game_move)
            .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;

        // The move put is conditional on (game_id, move_number) not existing,
        // so applying the same move twice fails the whole transaction instead
        // of silently overwriting the log.
        let transaction_items = vec![
            TransactWriteItem::builder()
                .put(
                    Put::builder()
                        .table_name(&self.games_table)
                        .set_item(Some(game_item))
                        .condition_expression("attribute_exists(id)")
                        .build()
                        .map_err(|e| GameRepositoryError::Transaction(e.to_string()))?,
                )
                .build(),
            TransactWriteItem::builder()
                .put(
                    Put::builder()
                        .table_name(&self.moves_table)
                        .set_item(Some(move_item))
                        .condition_expression("attribute_not_exists(move_number)")
                        .build()
                        .map_err(|e| GameRepositoryError::Transaction(e.to_string()))?,
                )
                .build(),
        ];

        self.client
            .transact_write_items()
            .set_transact_items(Some(transaction_items))
            .send()
            .await
            .map_err(|e| GameRepositoryError::Transaction(e.to_string()))?;

        Ok(())
    }

    async fn find_moves(&self, game_id: &str) -> Result<Vec<GameMove>, GameRepositoryError> {
        let query_result = self
            .client
            .query()
            .table_name(&self.moves_table)
            .key_condition_expression("game_id = :game_id")
            .expression_attribute_values(":game_id", AttributeValue::S(game_id.to_string()))
            .scan_index_forward(true)
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;

        let mut moves = Vec::new();

        if let Some(items) = query_result.items {
            for item in items {
                let game_move: GameMove = serde_dynamo::from_item(item)
                    .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
                moves.push(game_move);
            }
        }

        moves.sort_by_key(|m| m.move_number);

        Ok(moves)
    }

    async fn used_answer_ids(&self, game_id: &str) -> Result<HashSet<String>, GameRepositoryError> {
        let moves = self.find_moves(game_id).await?;

        Ok(moves
            .iter()
            .filter_map(|m| m.consumed_answer_id())
            .map(|id| id.to_string())
            .collect())
    }

    async fn find_by_match(&self, match_id: &str) -> Result<Vec<Game>, GameRepositoryError> {
        let query_result = self
            .client
            .query()
            .table_name(&self.games_table)
            .index_name("match_id-index")
            .key_condition_expression("match_id = :match_id")
            .expression_attribute_values(":match_id", AttributeValue::S(match_id.to_string()))
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;

        let mut games = Vec::new();

        if let Some(items) = query_result.items {
            for item in items {
                let game: Game = serde_dynamo::from_item(item)
                    .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
                games.push(game);
            }
        }

        games.sort_by_key(|g| g.game_number);

        Ok(games)
    }

    async fn count_completed(&self, match_id: &str) -> Result<u32, GameRepositoryError> {
        let games = self.find_by_match(match_id).await?;

        Ok(games.iter().filter(|g| g.is_completed()).count() as u32)
    }

    async fn find_in_progress_by_match(
        &self,
        match_id: &str,
    ) -> Result<Option<Game>, GameRepositoryError> {
        let games = self.find_by_match(match_id).await?;

        Ok(games.into_iter().find(|g| g.is_in_progress()))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // In-memory repository for service tests. `fail_writes` simulates the
    // persistence layer being unavailable.
    pub struct MockGameRepository {
        pub games: Mutex<HashMap<String, Game>>,
        pub moves: Mutex<Vec<GameMove>>,
        pub fail_writes: bool,
    }

    impl MockGameRepository {
        pub fn new() -> Self {
            Self {
                games: Mutex::new(HashMap::new()),
                moves: Mutex::new(Vec::new()),
                fail_writes: false,
            }
        }

        pub fn failing_writes() -> Self {
            Self {
                fail_writes: true,
                ..Self::new()
            }
        }

        pub fn with_game(self, game: Game) -> Self {
            self.games.lock().unwrap().insert(game.id.clone(), game);
            self
        }
    }

    #[async_trait]
    impl GameRepository for MockGameRepository {
        async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
            if self.fail_writes {
                return Err(GameRepositoryError::DynamoDb("unavailable".to_string()));
            }
            self.games
                .lock()
                .unwrap()
                .insert(game.id.clone(), game.clone());
            Ok(())
        }

        async fn get_game(&self, game_id: &str) -> Result<Option<Game>, GameRepositoryError> {
            Ok(self.games.lock().unwrap().get(game_id).cloned())
        }

        async fn update_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
            if self.fail_writes {
                return Err(GameRepositoryError::DynamoDb("unavailable".to_string()));
            }
            self.games
                .lock()
                .unwrap()
                .insert(game.id.clone(), game.clone());
            Ok(())
        }

        async fn apply_move(
            &self,
            game: &Game,
            game_move: &GameMove,
        ) -> Result<(), GameRepositoryError> {
            if self.fail_writes {
                return Err(GameRepositoryError::Transaction("unavailable".to_string()));
            }

            let mut moves = self.moves.lock().unwrap();
            let duplicate = moves
                .iter()
                .any(|m| m.game_id == game_move.game_id && m.move_number == game_move.move_number);
            if duplicate {
                return Err(GameRepositoryError::Transaction(
                    "Move number already recorded".to_string(),
                ));
            }

            moves.push(game_move.clone());
            self.games
                .lock()
                .unwrap()
                .insert(game.id.clone(), game.clone());
            Ok(())
        }

        async fn find_moves(&self, game_id: &str) -> Result<Vec<GameMove>, GameRepositoryError> {
            let mut moves: Vec<GameMove> = self
                .moves
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.game_id == game_id)
                .cloned()
                .collect();

            moves.sort_by_key(|m| m.move_number);

            Ok(moves)
        }

        async fn used_answer_ids(
            &self,
            game_id: &str,
        ) -> Result<HashSet<String>, GameRepositoryError> {
            let moves = self.find_moves(game_id).await?;

            Ok(moves
                .iter()
                .filter_map(|m| m.consumed_answer_id())
                .map(|id| id.to_string())
                .collect())
        }

        async fn find_by_match(&self, match_id: &str) -> Result<Vec<Game>, GameRepositoryError> {
            let mut games: Vec<Game> = self
                .games
                .lock()
                .unwrap()
                .values()
                .filter(|g| g.match_id == match_id)
                .cloned()
                .collect();

            games.sort_by_key(|g| g.game_number);

            Ok(games)
        }

        async fn count_completed(&self, match_id: &str) -> Result<u32, GameRepositoryError> {
            let games = self.find_by_match(match_id).await?;
            Ok(games.iter().filter(|g| g.is_completed()).count() as u32)
        }

        async fn find_in_progress_by_match(
            &self,
            match_id: &str,
        ) -> Result<Option<Game>, GameRepositoryError> {
            let games = self.find_by_match(match_id).await?;
            Ok(games.into_iter().find(|g| g.is_in_progress()))
        }
    }
}
