use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Emails are stored as submitted; this index makes uniqueness ignore case.
/// `users_email_key` from the create migration still guards exact duplicates.
const CREATE_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_key ON users (LOWER(email))";
const DROP_INDEX: &str = "DROP INDEX IF EXISTS users_email_lower_key";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(CREATE_INDEX)
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(DROP_INDEX).await?;
        Ok(())
    }
}
