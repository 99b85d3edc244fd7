use std::sync::Arc;
use thiserror::Error;

use crate::models::{CheckInsHistoryRequest, CheckInsHistoryResponse, UserMetricsRequest, UserMetricsResponse};
use crate::services::{CheckInStore, StoreError};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Pages through a user's past check-ins, newest first
pub struct FetchUserCheckInsHistoryUseCase {
    check_ins: Arc<dyn CheckInStore>,
}

impl FetchUserCheckInsHistoryUseCase {
    pub fn new(check_ins: Arc<dyn CheckInStore>) -> Self {
        Self { check_ins }
    }

    pub async fn execute(&self, request: CheckInsHistoryRequest) -> Result<CheckInsHistoryResponse, HistoryError> {
        let check_ins = self
            .check_ins
            .find_many_by_user_id(&request.user_id, request.page)
            .await?;

        Ok(CheckInsHistoryResponse { check_ins })
    }
}

/// Counts a user's check-ins
pub struct GetUserMetricsUseCase {
    check_ins: Arc<dyn CheckInStore>,
}

impl GetUserMetricsUseCase {
    pub fn new(check_ins: Arc<dyn CheckInStore>) -> Self {
        Self { check_ins }
    }

    pub async fn execute(&self, request: UserMetricsRequest) -> Result<UserMetricsResponse, HistoryError> {
        let check_ins_count = self.check_ins.count_by_user_id(&request.user_id).await?;
        Ok(UserMetricsResponse { check_ins_count })
    }
}
