use crate::{api::auth::AdminKey, service::LinkService};

#[derive(Clone)]
pub struct AppState {
    pub links: LinkService,
    pub admin: AdminKey,
}

impl AppState {
    pub fn new(links: LinkService, admin: AdminKey) -> Self {
        Self { links, admin }
    }
}
