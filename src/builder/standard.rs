//! The default builder: templates, text and raster images

use super::session::BuilderSession;
use super::DocumentBuilder;

pub struct StandardBuilder {
    session: BuilderSession,
}

impl StandardBuilder {
    pub fn new() -> Self {
        Self {
            session: BuilderSession::new(),
        }
    }
}

impl Default for StandardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder for StandardBuilder {
    fn session(&mut self) -> &mut BuilderSession {
        &mut self.session
    }

    fn session_ref(&self) -> &BuilderSession {
        &self.session
    }
}
