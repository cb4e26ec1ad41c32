use payloads::responses::UserProfile;
use payloads::{
    PaymentMethod, Permission, Product, Review, Role, SupportTicket, User,
    UserId,
};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::server::MockError;

/// Rows of one collection plus the id sequence for new records.
#[derive(Debug)]
pub struct Table<T> {
    pub rows: Vec<T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    pub fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> &T {
        let id = self.next_id();
        self.rows.push(build(id));
        &self.rows[self.rows.len() - 1]
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: Table<User>,
    pub roles: Table<Role>,
    pub permissions: Table<Permission>,
    pub payment_methods: Table<PaymentMethod>,
    pub reviews: Table<Review>,
    pub products: Table<Product>,
    pub tickets: Table<SupportTicket>,
    /// username -> (password, user)
    credentials: HashMap<String, (String, UserId)>,
    staff: HashSet<UserId>,
}

impl Store {
    pub fn set_password(&mut self, username: &str, password: &str, id: UserId) {
        self.credentials
            .insert(username.to_string(), (password.to_string(), id));
    }

    pub fn forget_credentials(&mut self, id: UserId) {
        self.credentials.retain(|_, (_, user)| *user != id);
    }

    pub fn set_staff(&mut self, id: UserId) {
        self.staff.insert(id);
    }

    pub fn check_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserId, MockError> {
        match self.credentials.get(username) {
            Some((expected, id)) if expected == password => Ok(*id),
            _ => Err(MockError::BadCredentials),
        }
    }

    pub fn user(&self, id: UserId) -> Result<&User, MockError> {
        self.users
            .rows
            .iter()
            .find(|u| u.id == id)
            .ok_or(MockError::NotFound("User"))
    }

    pub fn profile(&self, id: UserId) -> Result<UserProfile, MockError> {
        let user = self.user(id)?;
        let permissions: BTreeSet<String> = user
            .roles
            .iter()
            .filter_map(|summary| {
                self.roles.rows.iter().find(|r| r.id == summary.id)
            })
            .filter(|role| role.is_active)
            .flat_map(|role| role.permissions.iter().map(|p| p.code.clone()))
            .collect();
        Ok(UserProfile {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            permissions: permissions.into_iter().collect(),
            is_staff: self.staff.contains(&id),
        })
    }
}
