//! Shared models and repository wiring for the integration tests.

#![allow(dead_code)]

use std::ops::Deref;
use std::sync::Arc;

use relink::prelude::*;
use serde::{Deserialize, Serialize};

/// Implement `Entity` for a model whose key fields are `Option<Identifier>`.
macro_rules! keyed_entity {
    ($model:ident, [$($field:ident),+ $(,)?]) => {
        impl Entity for $model {
            const MODEL_NAME: &'static str = stringify!($model);

            fn key(&self, field: &str) -> Option<Identifier> {
                match field {
                    $(stringify!($field) => self.$field.clone(),)+
                    _ => None,
                }
            }

            fn set_key(&mut self, field: &str, value: Identifier) -> QueryResult<()> {
                match field {
                    $(stringify!($field) => self.$field = Some(value),)+
                    _ => return Err(QueryError::unknown_field(Self::MODEL_NAME, field)),
                }
                Ok(())
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<Identifier>,
    pub name: String,
    pub parent_id: Option<Identifier>,
}

impl Customer {
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            parent_id: None,
        }
    }
}

keyed_entity!(Customer, [id, parent_id]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<Identifier>,
    pub description: String,
    pub customer_id: Option<Identifier>,
    pub is_shipped: Option<bool>,
}

impl Order {
    pub fn new(description: &str, customer_id: Option<Identifier>) -> Self {
        Self {
            id: None,
            description: description.to_string(),
            customer_id,
            is_shipped: None,
        }
    }
}

keyed_entity!(Order, [id, customer_id]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: Option<Identifier>,
    pub street: String,
    pub city: String,
    pub province: String,
    pub zipcode: String,
    pub customer_id: Option<Identifier>,
}

impl Address {
    pub fn new(street: &str, city: &str, zipcode: &str, customer_id: Option<Identifier>) -> Self {
        Self {
            id: None,
            street: street.to_string(),
            city: city.to_string(),
            province: "Asgard".to_string(),
            zipcode: zipcode.to_string(),
            customer_id,
        }
    }
}

keyed_entity!(Address, [id, customer_id]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoWithId {
    pub id: Option<Identifier>,
    pub title: String,
    pub desc: Option<String>,
    pub is_complete: bool,
}

impl TodoWithId {
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id: Some(Identifier::Int(id)),
            title: title.to_string(),
            desc: None,
            is_complete: false,
        }
    }
}

keyed_entity!(TodoWithId, [id]);

pub type Orders = HasManyRepositoryFactory<Customer, Order, MemoryRepository<Order>>;
pub type Children = HasManyRepositoryFactory<Customer, Customer, MemoryRepository<Customer>>;
pub type CustomerAddress = HasOneRepositoryFactory<Customer, Address, MemoryRepository<Address>>;
pub type AddressCustomer = BelongsToAccessor<Address, Customer, MemoryRepository<Customer>>;

/// Customer repository with its relations.
pub struct CustomerRepository {
    repo: Arc<MemoryRepository<Customer>>,
    pub orders: Orders,
    pub customers: Children,
    pub address: CustomerAddress,
}

impl Deref for CustomerRepository {
    type Target = MemoryRepository<Customer>;

    fn deref(&self) -> &Self::Target {
        &self.repo
    }
}

/// Address repository with its relations.
pub struct AddressRepository {
    repo: Arc<MemoryRepository<Address>>,
    pub customer: AddressCustomer,
}

impl Deref for AddressRepository {
    type Target = MemoryRepository<Address>;

    fn deref(&self) -> &Self::Target {
        &self.repo
    }
}

/// Every repository of the fixture, wired to one data source.
pub struct Repositories {
    pub db: MemoryDataSource,
    pub customers: CustomerRepository,
    pub orders: Arc<MemoryRepository<Order>>,
    pub addresses: AddressRepository,
}

impl Repositories {
    /// Restore the resolvers the factories registered on creation.
    pub fn restore_resolvers(&self) {
        let resolvers = self.customers.inclusion_resolvers();
        resolvers.set("orders", self.customers.orders.inclusion_resolver());
        resolvers.set("customers", self.customers.customers.inclusion_resolver());
        resolvers.set("address", self.customers.address.inclusion_resolver());
        self.addresses
            .inclusion_resolvers()
            .set("customer", self.addresses.customer.inclusion_resolver());
    }
}

/// Create the repositories and bind every relation.
///
/// Customer-side relations reach their targets through fixed getters; the
/// address-to-customer relation goes through a deferred slot bound last,
/// since the customer repository is the one holding the address relation.
pub fn given_bound_repositories(id_type: IdType) -> Repositories {
    let db = MemoryDataSource::new(MemoryConfig::new("db").id_type(id_type));

    let customer_repo = Arc::new(MemoryRepository::<Customer>::new(&db).unwrap());
    let order_repo = Arc::new(MemoryRepository::<Order>::new(&db).unwrap());
    let address_repo = Arc::new(MemoryRepository::<Address>::new(&db).unwrap());

    let orders = customer_repo
        .create_has_many_repository_factory_for(
            RelationDefinition::has_many("orders", "Customer", "Order"),
            Getter::fixed(order_repo.clone()),
        )
        .unwrap();
    let customers = customer_repo
        .create_has_many_repository_factory_for(
            RelationDefinition::has_many("customers", "Customer", "Customer").key_to("parent_id"),
            Getter::from_weak(Arc::downgrade(&customer_repo)),
        )
        .unwrap();
    let address = customer_repo
        .create_has_one_repository_factory_for(
            RelationDefinition::has_one("address", "Customer", "Address"),
            Getter::fixed(address_repo.clone()),
        )
        .unwrap();

    let customer_slot = Deferred::new();
    let customer = address_repo
        .create_belongs_to_accessor_for(
            RelationDefinition::belongs_to("customer", "Address", "Customer"),
            customer_slot.getter(),
        )
        .unwrap();
    customer_slot.bind(&customer_repo).unwrap();

    Repositories {
        db,
        customers: CustomerRepository {
            repo: customer_repo,
            orders,
            customers,
            address,
        },
        orders: order_repo,
        addresses: AddressRepository {
            repo: address_repo,
            customer,
        },
    }
}
