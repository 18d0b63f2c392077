use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::test_api::{ActiveModel, Column, Entity as TestApiEntity};
use crate::error::AppResult;
use crate::models::{NewTestApi, TestApi};

/// Test result repository for database operations
pub struct TestApiRepository;

impl TestApiRepository {
    /// Bulk insert the rows of one run
    pub async fn create_many(db: &DatabaseConnection, rows: &[NewTestApi]) -> AppResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let now = time::OffsetDateTime::now_utc();
        let models = rows.iter().map(|row| ActiveModel {
            id: Set(Uuid::new_v4()),
            test_id: Set(row.test_id),
            test_type: Set(row.test_type.as_str().to_string()),
            api_name: Set(row.api_name.clone()),
            success: Set(row.success),
            http_code: Set(row.http_code),
            http_resp: Set(row.http_resp.clone()),
            err_msg: Set(row.err_msg.clone()),
            path_str: Set(row.path_str.clone()),
            body_req: Set(row.body_req.clone()),
            query: Set(row.query.clone()),
            form_data: Set(row.form_data.clone()),
            file_ext: Set(row.file_ext.clone()),
            time_consuming: Set(row.time_consuming.clone()),
            start_time: Set(row.start_time),
            created_at: Set(now),
        });

        let inserted = TestApiEntity::insert_many(models)
            .exec_without_returning(db)
            .await?;

        Ok(inserted)
    }

    /// All rows of one run
    pub async fn list_by_test_id(db: &DatabaseConnection, test_id: Uuid) -> AppResult<Vec<TestApi>> {
        let models = TestApiEntity::find()
            .filter(Column::TestId.eq(test_id))
            .order_by_asc(Column::StartTime)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// All rows of the most recently persisted run
    pub async fn latest(db: &DatabaseConnection) -> AppResult<Vec<TestApi>> {
        let newest = TestApiEntity::find()
            .order_by_desc(Column::CreatedAt)
            .one(db)
            .await?;

        match newest {
            Some(row) => Self::list_by_test_id(db, row.test_id).await,
            None => Ok(Vec::new()),
        }
    }
}
