use lazy_static::lazy_static;


/// An entry in the fixed allow-list. There is no hashing and no lockout;
/// this application has no real security requirement in scope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

lazy_static! {
    static ref AUTHORIZED_USERS: Vec<AuthUser> = vec![
        AuthUser {
            id: "1".to_owned(),
            email: "johndoe@gmail.com".to_owned(),
            password: "123abc!@".to_owned(),
            name: "John Doe".to_owned(),
        },
        AuthUser {
            id: "2".to_owned(),
            email: "reetikesh@gmail.com".to_owned(),
            password: "123abc!@".to_owned(),
            name: "Reetikesh".to_owned(),
        },
        AuthUser {
            id: "3".to_owned(),
            email: "srijan@gmail.com".to_owned(),
            password: "123abc!@".to_owned(),
            name: "Srijan".to_owned(),
        },
    ];
}

/// Returns the matching allow-list entry, or `None` on any mismatch. A miss is
/// a negative result, not an error; callers show a generic message that does
/// not distinguish unknown email from wrong password.
///
/// Email comparison is case-insensitive but does NOT trim surrounding
/// whitespace. Password comparison is exact.
pub fn validate_credentials(email: &str, password: &str) -> Option<&'static AuthUser> {
    AUTHORIZED_USERS
        .iter()
        .find(|user| user.email.to_lowercase() == email.to_lowercase() && user.password == password)
}

pub fn is_authorized_email(email: &str) -> bool {
    AUTHORIZED_USERS
        .iter()
        .any(|user| user.email.to_lowercase() == email.to_lowercase())
}
