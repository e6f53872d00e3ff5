use async_trait::async_trait;

use crate::error::LedgerError;
use crate::value::RawValue;

/// Read access to one fixed record store on a ledger.
#[async_trait]
pub trait LedgerReader: Send + Sync {
  /// Read `field`, passing `args` (empty for scalar fields, the 1-based
  /// index for indexed fields). Returns the raw result tuple.
  async fn read_field(
    &self,
    field: &str,
    args: &[RawValue],
  ) -> Result<Vec<RawValue>, LedgerError>;
}

#[async_trait]
impl<T: LedgerReader + ?Sized> LedgerReader for std::sync::Arc<T> {
  async fn read_field(
    &self,
    field: &str,
    args: &[RawValue],
  ) -> Result<Vec<RawValue>, LedgerError> {
    (**self).read_field(field, args).await
  }
}
