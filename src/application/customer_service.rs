use chrono::Utc;
use uuid::Uuid;

use crate::domain::customer::{Customer, CustomerStatus};
use crate::domain::errors::DomainError;
use crate::domain::ports::RentalRepository;

#[derive(Debug, Clone)]
pub struct CustomerDraft {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub nik: Option<String>,
    pub id_card_image: Option<String>,
}

pub struct CustomerService<R> {
    repo: R,
}

impl<R: RentalRepository> CustomerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Self-registration from the public form: the customer starts Pending
    /// and must be approved before renting. An identity card photo is
    /// mandatory there, unlike admin entry.
    pub fn register(&self, draft: CustomerDraft) -> Result<Customer, DomainError> {
        if draft.id_card_image.as_deref().unwrap_or("").is_empty() {
            return Err(DomainError::InvalidInput(
                "an identity card photo is required".to_string(),
            ));
        }
        self.insert(draft, CustomerStatus::Pending)
    }

    /// Admin-entered customers are trusted and start Approved.
    pub fn create(&self, draft: CustomerDraft) -> Result<Customer, DomainError> {
        self.insert(draft, CustomerStatus::Approved)
    }

    fn insert(
        &self,
        draft: CustomerDraft,
        status: CustomerStatus,
    ) -> Result<Customer, DomainError> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "customer name is required".to_string(),
            ));
        }

        let mut data = self.repo.load()?;
        let customer = Customer {
            id: Uuid::new_v4(),
            name: draft.name,
            phone: draft.phone,
            address: draft.address,
            nik: draft.nik,
            id_card_image: draft.id_card_image,
            status,
            created_at: Utc::now(),
        };
        data.customers.insert(0, customer.clone());
        self.repo.save(&data)?;
        log::info!("customer {} registered as {:?}", customer.id, status);
        Ok(customer)
    }

    /// Edit an existing customer; the approval status and registration time
    /// stay as they are, and the stored id-card photo is kept unless a new
    /// one is supplied.
    pub fn update(&self, id: Uuid, draft: CustomerDraft) -> Result<Customer, DomainError> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "customer name is required".to_string(),
            ));
        }

        let mut data = self.repo.load()?;
        let updated = {
            let customer = data.customer_mut(id).ok_or(DomainError::NotFound)?;
            customer.name = draft.name;
            customer.phone = draft.phone;
            customer.address = draft.address;
            customer.nik = draft.nik;
            if draft.id_card_image.is_some() {
                customer.id_card_image = draft.id_card_image;
            }
            customer.clone()
        };
        self.repo.save(&data)?;
        Ok(updated)
    }

    pub fn approve(&self, id: Uuid) -> Result<Customer, DomainError> {
        let mut data = self.repo.load()?;
        let approved = {
            let customer = data.customer_mut(id).ok_or(DomainError::NotFound)?;
            customer.status = CustomerStatus::Approved;
            customer.clone()
        };
        self.repo.save(&data)?;
        Ok(approved)
    }

    pub fn list(&self, status: Option<CustomerStatus>) -> Result<Vec<Customer>, DomainError> {
        let data = self.repo.load()?;
        Ok(data
            .customers
            .iter()
            .filter(|c| status.map(|s| c.status == s).unwrap_or(true))
            .cloned()
            .collect())
    }

    pub fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut data = self.repo.load()?;
        let index = data
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or(DomainError::NotFound)?;
        data.customers.remove(index);
        self.repo.save(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::JsonStore;
    use std::sync::Arc;

    fn service() -> CustomerService<Arc<JsonStore>> {
        CustomerService::new(Arc::new(JsonStore::in_memory()))
    }

    fn draft(name: &str) -> CustomerDraft {
        CustomerDraft {
            name: name.to_string(),
            phone: "081234".to_string(),
            address: "Jl. Kenanga 5".to_string(),
            nik: Some("3201010101010001".to_string()),
            id_card_image: Some("ktp.jpg".to_string()),
        }
    }

    #[test]
    fn public_registration_starts_pending() {
        let svc = service();
        let customer = svc.register(draft("Budi")).expect("register failed");
        assert_eq!(customer.status, CustomerStatus::Pending);
    }

    #[test]
    fn public_registration_requires_id_card_photo() {
        let svc = service();
        let mut d = draft("Budi");
        d.id_card_image = None;
        assert!(matches!(
            svc.register(d),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn admin_entry_starts_approved() {
        let svc = service();
        let customer = svc.create(draft("Sari")).expect("create failed");
        assert_eq!(customer.status, CustomerStatus::Approved);
    }

    #[test]
    fn update_keeps_status_and_id_card() {
        let svc = service();
        let customer = svc.register(draft("Budi")).expect("register failed");

        let mut edit = draft("Budi Santoso");
        edit.id_card_image = None;
        let updated = svc.update(customer.id, edit).expect("update failed");
        assert_eq!(updated.name, "Budi Santoso");
        assert_eq!(updated.status, CustomerStatus::Pending);
        assert_eq!(updated.id_card_image.as_deref(), Some("ktp.jpg"));
    }

    #[test]
    fn approve_flips_pending_customer() {
        let svc = service();
        let customer = svc.register(draft("Budi")).expect("register failed");

        let approved = svc.approve(customer.id).expect("approve failed");
        assert_eq!(approved.status, CustomerStatus::Approved);

        let pending = svc.list(Some(CustomerStatus::Pending)).expect("list failed");
        assert!(pending.is_empty());
    }

    #[test]
    fn list_filters_by_status() {
        let svc = service();
        svc.register(draft("Budi")).expect("register failed");
        svc.create(draft("Sari")).expect("create failed");

        let pending = svc.list(Some(CustomerStatus::Pending)).expect("list failed");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Budi");

        let all = svc.list(None).expect("list failed");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn delete_unknown_customer_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.delete(Uuid::new_v4()),
            Err(DomainError::NotFound)
        ));
    }
}
