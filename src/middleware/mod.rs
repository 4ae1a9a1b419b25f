pub mod csrf;
pub mod flash;
pub mod security_headers;

pub use csrf::{
    generate_csrf_token, get_or_create_csrf_token, validate_csrf_form_field, CsrfError,
    CsrfToken, CSRF_TOKEN_KEY,
};
pub use flash::{FlashLevel, FlashMessage};
pub use security_headers::add_security_headers;
