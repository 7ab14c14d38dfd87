use crate::client::error::ClientError;
use crate::db::error::DbError;
use crate::export::ExportError;
use crate::forecast_data::error::PayloadError;
use crate::transform::error::TransformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastEtlError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Db(#[from] DbError),
}
