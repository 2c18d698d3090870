//! User Entity
//!
//! Account plus profile. The password hash lives here but never leaves the
//! crate boundary in a response; see `presentation::dto::UserResponse`.

use chrono::{DateTime, Utc};
use kernel::pagination::Cursor;
use uuid::Uuid;

use crate::domain::value_object::{
    AcademicYear, Bio, Email, PersonName, UserId, UserPassword, Username,
};

#[derive(Debug, Clone)]
pub struct User {
    /// UUID v7, so ids sort by creation time
    pub user_id: UserId,
    pub email: Email,
    pub username: Username,
    pub password: UserPassword,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub bio: Option<Bio>,
    pub academic_year: Option<AcademicYear>,
    /// Object-storage reference; the upload itself happens elsewhere
    pub profile_photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated sign-up fields.
#[derive(Debug)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub bio: Option<Bio>,
}

/// Validated profile edit. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub username: Option<Username>,
    pub bio: Option<Bio>,
    pub profile_photo: Option<String>,
}

impl User {
    pub fn new(fields: NewUser, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email: fields.email,
            username: fields.username,
            password,
            first_name: fields.first_name,
            last_name: fields.last_name,
            bio: fields.bio,
            academic_year: None,
            profile_photo: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_profile(&mut self, changes: ProfileChanges) {
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(bio) = changes.bio {
            self.bio = Some(bio);
        }
        if let Some(photo) = changes.profile_photo {
            self.profile_photo = Some(photo);
        }
        self.touch();
    }

    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.touch();
    }

    pub fn set_academic_year(&mut self, year: AcademicYear) {
        self.academic_year = Some(year);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Cursor for User {
    fn cursor(&self) -> Uuid {
        *self.user_id.as_uuid()
    }
}
