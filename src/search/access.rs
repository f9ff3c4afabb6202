//! Access scoping for protected documents.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::document::Document;

/// The identity a search runs as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    pub principal_id: Uuid,
    #[serde(default)]
    pub group_ids: Vec<Uuid>,
}

impl AccessContext {
    pub fn new<I: IntoIterator<Item = Uuid>>(principal_id: Uuid, group_ids: I) -> Self {
        AccessContext {
            principal_id,
            group_ids: group_ids.into_iter().collect(),
        }
    }

    fn identities(&self) -> impl Iterator<Item = &Uuid> {
        std::iter::once(&self.principal_id).chain(&self.group_ids)
    }
}

/// Check whether `document` is visible to `context`.
///
/// Unprotected documents are visible to everyone. Protected documents need a
/// context whose principal or one of whose groups holds an access key.
pub fn is_visible(document: &Document, context: Option<&AccessContext>) -> bool {
    let Some(protection) = document.protection() else {
        return true;
    };

    context.is_some_and(|context| {
        context
            .identities()
            .any(|id| protection.access_keys.contains(id))
    })
}
