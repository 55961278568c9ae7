pub mod credential;
pub mod resolver;
pub mod session;
pub mod token;

pub use resolver::PrincipalResolver;
pub use session::SessionStore;
pub use token::TokenSigner;
