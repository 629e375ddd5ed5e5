/// User service - business rules on top of the user store
use async_trait::async_trait;
use maria_core::{
    ModifyUserRequest, NewUserRequest, UniqueField, User, UserError, UserId, UserPersister,
    UserSelector,
};

type Result<T> = std::result::Result<T, UserError>;

/// Operations the HTTP layer needs from the user service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserManager: Send + Sync {
    /// Get a user, failing with `NotFound` when it does not exist
    async fn get_by_id(&self, id: UserId) -> Result<User>;

    /// Create a user whose unique fields are not taken yet
    async fn create_user(&self, request: &NewUserRequest) -> Result<User>;

    /// Apply `request` to the user identified by `selector`
    async fn modify_user(
        &self,
        request: &ModifyUserRequest,
        selector: &UserSelector,
    ) -> Result<User>;
}

/// Stateless user service over an injected persister
#[derive(Debug, Clone)]
pub struct UserService<P> {
    persister: P,
}

impl<P: UserPersister> UserService<P> {
    pub fn new(persister: P) -> Self {
        Self { persister }
    }

    async fn find_by_id(&self, id: UserId) -> Result<User> {
        self.persister
            .select_by_id(id)
            .await?
            .ok_or_else(|| UserError::not_found("user_id", id))
    }

    /// Find the single user a selector points at
    async fn resolve(&self, selector: &UserSelector) -> Result<User> {
        let (user_name, alias, value) = match selector {
            UserSelector::Id(id) => return self.find_by_id(*id).await,
            UserSelector::UserName(name) => (name.as_str(), "", name),
            UserSelector::Alias(alias) => ("", alias.as_str(), alias),
        };

        let mut users = self.persister.select_by_any(user_name, alias, "").await?;
        match users.len() {
            0 => Err(UserError::not_found(selector.key(), value)),
            1 => Ok(users.remove(0)),
            n => {
                tracing::error!("{} users share {}, uniqueness is broken", n, selector);
                Err(UserError::conflict(selector.key(), value))
            }
        }
    }
}

#[async_trait]
impl<P: UserPersister> UserManager for UserService<P> {
    async fn get_by_id(&self, id: UserId) -> Result<User> {
        self.find_by_id(id).await
    }

    async fn create_user(&self, request: &NewUserRequest) -> Result<User> {
        let existing = self
            .persister
            .select_by_any(&request.user_name, &request.alias, &request.email)
            .await?;

        if let Some(field) = UniqueField::first_conflict(&existing, request) {
            tracing::debug!("Rejecting new user, {} already taken", field);
            return Err(UserError::DuplicateValue(field));
        }

        let user = self.persister.create_user(request).await?;
        tracing::info!("Created user {} ({})", user.id, user.user_name);
        Ok(user)
    }

    async fn modify_user(
        &self,
        request: &ModifyUserRequest,
        selector: &UserSelector,
    ) -> Result<User> {
        tracing::debug!("Resolving user by {}", selector);
        let target = self.resolve(selector).await?;

        let request = request.clone();
        let updated = self
            .persister
            .with_transaction(move |tx| {
                Box::pin(async move {
                    tracing::debug!("Updating user {}", target.id);
                    let modified = tx.modify_user(&request, &target).await?;

                    tracing::debug!("Reselecting user {}", modified.id);
                    tx.select_by_id(modified.id)
                        .await?
                        .ok_or_else(|| UserError::not_found("user_id", modified.id))
                })
            })
            .await?;

        tracing::info!("Updated user {} (active={})", updated.id, updated.active);
        Ok(updated)
    }
}
