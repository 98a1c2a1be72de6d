use std::sync::Arc;

use crate::application::admin::AdminLiveShowService;

#[derive(Clone)]
pub struct AdminState {
    pub live_show: Arc<AdminLiveShowService>,
}
