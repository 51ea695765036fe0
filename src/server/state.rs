use crate::care::NearbyCareService;

pub struct AppState {
    pub care: NearbyCareService,
}
