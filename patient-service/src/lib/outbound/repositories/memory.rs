use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::patient::errors::PatientError;
use crate::domain::patient::models::CreatePatientCommand;
use crate::domain::patient::models::Patient;
use crate::domain::patient::models::PatientId;
use crate::domain::patient::models::PatientQuery;
use crate::domain::patient::models::UpdatePatientCommand;
use crate::domain::patient::ports::PatientRepository;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// User store held in process memory.
///
/// Enforces the same uniqueness rules as the Postgres schema. Intended for
/// tests and local runs without a database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the active flag, as an administrator would out of band.
    ///
    /// Returns `false` when no such user exists.
    pub async fn set_active(&self, id: &UserId, is_active: bool) -> bool {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) => {
                user.is_active = is_active;
                user.updated_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(user.username.to_string()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let stored = User {
            id: UserId::new(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            created_at: Utc::now(),
            updated_at: None,
        };
        users.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username.as_str() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email.as_str() == email).cloned())
    }
}

/// Patient store held in process memory, in insertion order.
#[derive(Default)]
pub struct InMemoryPatientRepository {
    patients: RwLock<Vec<Patient>>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.patients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.patients.read().await.is_empty()
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn create(&self, command: CreatePatientCommand) -> Result<Patient, PatientError> {
        let mut patients = self.patients.write().await;

        if patients.iter().any(|p| p.email == command.email) {
            return Err(PatientError::EmailAlreadyExists(command.email.to_string()));
        }

        let patient = Patient {
            id: PatientId::new(),
            name: command.name,
            email: command.email,
            phone: command.phone,
            created_at: Utc::now(),
            updated_at: None,
        };
        patients.push(patient.clone());

        Ok(patient)
    }

    async fn find_by_id(&self, id: &PatientId) -> Result<Option<Patient>, PatientError> {
        let patients = self.patients.read().await;
        Ok(patients.iter().find(|p| &p.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, PatientError> {
        let patients = self.patients.read().await;
        Ok(patients.iter().find(|p| p.email.as_str() == email).cloned())
    }

    async fn search(&self, query: &PatientQuery) -> Result<Vec<Patient>, PatientError> {
        let needle = query.search().map(str::to_lowercase);
        let patients = self.patients.read().await;

        Ok(patients
            .iter()
            .rev()
            .filter(|p| match &needle {
                Some(needle) => p.name.as_str().to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .skip(query.skip() as usize)
            .take(query.limit() as usize)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &PatientId,
        command: UpdatePatientCommand,
    ) -> Result<Option<Patient>, PatientError> {
        let mut patients = self.patients.write().await;

        if let Some(email) = &command.email {
            if patients.iter().any(|p| &p.email == email && &p.id != id) {
                return Err(PatientError::EmailAlreadyExists(email.to_string()));
            }
        }

        let Some(patient) = patients.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };

        if let Some(name) = command.name {
            patient.name = name;
        }
        if let Some(email) = command.email {
            patient.email = email;
        }
        if let Some(phone) = command.phone {
            patient.phone = phone;
        }
        patient.updated_at = Some(Utc::now());

        Ok(Some(patient.clone()))
    }

    async fn delete(&self, id: &PatientId) -> Result<bool, PatientError> {
        let mut patients = self.patients.write().await;
        let before = patients.len();
        patients.retain(|p| &p.id != id);
        Ok(patients.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patient::models::PatientName;
    use crate::domain::patient::models::PhoneNumber;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Username;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser::new(
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            "$argon2id$hash".to_string(),
            None,
        )
    }

    fn new_patient(name: &str, email: &str) -> CreatePatientCommand {
        CreatePatientCommand::new(
            PatientName::new(name.to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            PhoneNumber::new("0123456789".to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let repository = InMemoryUserRepository::new();

        let user = repository
            .create(new_user("alice01", "alice@x.com"))
            .await
            .unwrap();
        assert!(user.is_active);
        assert!(user.updated_at.is_none());

        assert!(matches!(
            repository.create(new_user("alice01", "other@x.com")).await,
            Err(UserError::UsernameAlreadyExists(_))
        ));
        assert!(matches!(
            repository.create(new_user("bob_02", "alice@x.com")).await,
            Err(UserError::EmailAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_user_lookups() {
        let repository = InMemoryUserRepository::new();
        let user = repository
            .create(new_user("alice01", "alice@x.com"))
            .await
            .unwrap();

        assert_eq!(
            repository.find_by_id(&user.id).await.unwrap().unwrap().id,
            user.id
        );
        assert!(repository.find_by_username("alice01").await.unwrap().is_some());
        assert!(repository.find_by_username("ALICE01").await.unwrap().is_none());
        assert!(repository.find_by_email("alice@x.com").await.unwrap().is_some());
        assert!(repository.find_by_id(&UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_active() {
        let repository = InMemoryUserRepository::new();
        let user = repository
            .create(new_user("alice01", "alice@x.com"))
            .await
            .unwrap();

        assert!(repository.set_active(&user.id, false).await);
        let stored = repository.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
        assert!(stored.updated_at.is_some());

        assert!(!repository.set_active(&UserId::new(), false).await);
    }

    #[tokio::test]
    async fn test_patient_search_newest_first_and_paginated() {
        let repository = InMemoryPatientRepository::new();
        for (name, email) in [
            ("Ana Souza", "ana@x.com"),
            ("Bruno Lima", "bruno@x.com"),
            ("Mariana Alves", "mariana@x.com"),
        ] {
            repository.create(new_patient(name, email)).await.unwrap();
        }

        let all = repository.search(&PatientQuery::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Mariana Alves", "Bruno Lima", "Ana Souza"]);

        let query = PatientQuery::new(Some("AN".to_string()), None, None).unwrap();
        let matched = repository.search(&query).await.unwrap();
        let names: Vec<_> = matched.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Mariana Alves", "Ana Souza"]);

        let page = PatientQuery::new(None, Some(1), Some(1)).unwrap();
        let paged = repository.search(&page).await.unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].name.as_str(), "Bruno Lima");
    }

    #[tokio::test]
    async fn test_patient_update_and_delete() {
        let repository = InMemoryPatientRepository::new();
        let ana = repository
            .create(new_patient("Ana Souza", "ana@x.com"))
            .await
            .unwrap();
        repository
            .create(new_patient("Bruno Lima", "bruno@x.com"))
            .await
            .unwrap();

        let taken = UpdatePatientCommand::new(
            None,
            Some(EmailAddress::new("bruno@x.com".to_string()).unwrap()),
            None,
        );
        assert!(matches!(
            repository.update(&ana.id, taken).await,
            Err(PatientError::EmailAlreadyExists(_))
        ));

        let rename = UpdatePatientCommand::new(
            Some(PatientName::new("Ana Maria".to_string()).unwrap()),
            None,
            None,
        );
        let updated = repository.update(&ana.id, rename).await.unwrap().unwrap();
        assert_eq!(updated.name.as_str(), "Ana Maria");
        assert_eq!(updated.email.as_str(), "ana@x.com");
        assert!(updated.updated_at.is_some());

        assert!(repository
            .update(&PatientId::new(), UpdatePatientCommand::default())
            .await
            .unwrap()
            .is_none());

        assert!(repository.delete(&ana.id).await.unwrap());
        assert!(!repository.delete(&ana.id).await.unwrap());
        assert_eq!(repository.len().await, 1);
    }
}
