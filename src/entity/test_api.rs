use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "test_api")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub test_id: Uuid,
    pub test_type: String,
    pub api_name: String,
    pub success: bool,
    pub http_code: i32,
    #[sea_orm(column_type = "Text")]
    pub http_resp: String,
    #[sea_orm(column_type = "Text")]
    pub err_msg: String,
    pub path_str: String,
    #[sea_orm(column_type = "Text")]
    pub body_req: String,
    pub query: String,
    #[sea_orm(column_type = "Text")]
    pub form_data: String,
    pub file_ext: String,
    pub time_consuming: String,
    pub start_time: i64,
    pub created_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
