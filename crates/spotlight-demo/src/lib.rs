pub mod config;
pub mod events;

pub mod gui {
    pub mod app;
    pub mod chrome;
    pub mod surface;
    pub mod text;
    pub mod theme;
    pub mod tour;
}

pub mod sys {
    pub mod runtime;
}
