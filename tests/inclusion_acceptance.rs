//! Acceptance tests for relation inclusion on the in-memory connector.
//!
//! These tests verify:
//! - Rejection of unknown or unregistered relations before any query
//! - belongsTo, hasMany and hasOne inclusion via `find_many` and `find_by_id`
//! - One fetch per relation regardless of the number of sources
//! - Propagation of target repository failures

mod common;

use std::sync::Arc;

use common::*;
use pretty_assertions::assert_eq;
use relink::prelude::*;
use serde_json::json;

fn repositories() -> Repositories {
    given_bound_repositories(IdType::Number)
}

// ========== Invalid includes ==========

#[tokio::test]
async fn test_unknown_relation_is_rejected() {
    let repos = repositories();
    repos
        .addresses
        .create(Address::new("home of Thor Rd.", "Thrudheim", "8200", None))
        .await
        .unwrap();
    repos.db.reset_stats();

    let err = repos.addresses.find_many().include("home").exec().await.unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidInclude);
    assert_eq!(
        err.message,
        r#"Invalid "filter.include" entries: {"relation":"home"}"#
    );
    assert_eq!(err.invalid_relations(), ["home".to_string()]);
    assert_eq!(repos.db.query_count(), 0);
}

#[tokio::test]
async fn test_every_unknown_relation_is_reported() {
    let repos = repositories();

    let err = repos
        .customers
        .find_many()
        .include("managers")
        .include("orders")
        .include("home")
        .exec()
        .await
        .unwrap_err();

    assert!(err.is_invalid_include());
    assert_eq!(err.invalid_relations(), ["managers".to_string(), "home".to_string()]);
    assert!(err.message.ends_with(r#"{"relation":"managers"}; {"relation":"home"}"#));
}

#[tokio::test]
async fn test_removed_resolver_is_rejected() {
    let repos = repositories();
    repos.addresses.inclusion_resolvers().remove("customer");

    let err = repos.addresses.find_many().include("customer").exec().await.unwrap_err();
    assert_eq!(
        err.message,
        r#"Invalid "filter.include" entries: {"relation":"customer"}"#
    );

    repos.restore_resolvers();
    assert!(repos.addresses.find_many().include("customer").exec().await.is_ok());
}

#[tokio::test]
async fn test_find_by_id_rejects_unknown_relation() {
    let repos = repositories();
    let thor = repos.customers.create(Customer::named("Thor")).await.unwrap();
    repos.db.reset_stats();

    let err = repos
        .customers
        .find_by_id(thor.id.clone().unwrap())
        .include("home")
        .exec()
        .await
        .unwrap_err();

    assert!(err.is_invalid_include());
    assert_eq!(repos.db.query_count(), 0);
}

#[test]
fn test_factories_register_resolvers() {
    let repos = repositories();
    assert_eq!(
        repos.customers.inclusion_resolvers().names(),
        vec!["orders", "customers", "address"]
    );
    assert!(repos.addresses.inclusion_resolvers().contains("customer"));
    assert!(repos.orders.inclusion_resolvers().is_empty());
}

// ========== belongsTo ==========

#[tokio::test]
async fn test_belongs_to_via_find_many() {
    let repos = repositories();
    let thor = repos.customers.create(Customer::named("Thor")).await.unwrap();
    let odin = repos.customers.create(Customer::named("Odin")).await.unwrap();
    let addr1 = repos
        .addresses
        .create(Address::new("home of Thor Rd.", "Thrudheim", "999", thor.id.clone()))
        .await
        .unwrap();
    let addr2 = repos
        .addresses
        .create(Address::new("home of Odin Rd.", "Valhalla", "000", odin.id.clone()))
        .await
        .unwrap();

    let result = repos.addresses.find_many().include("customer").exec().await.unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!([
            {
                "id": 1,
                "street": "home of Thor Rd.",
                "city": "Thrudheim",
                "province": "Asgard",
                "zipcode": "999",
                "customer_id": 1,
                "customer": { "id": 1, "name": "Thor", "parent_id": null }
            },
            {
                "id": 2,
                "street": "home of Odin Rd.",
                "city": "Valhalla",
                "province": "Asgard",
                "zipcode": "000",
                "customer_id": 2,
                "customer": { "id": 2, "name": "Odin", "parent_id": null }
            }
        ])
    );
    assert_eq!(result[0].entity, addr1);
    assert_eq!(result[1].relation::<Customer>("customer").unwrap(), Some(odin));
    assert_eq!(result[1].entity, addr2);
}

#[tokio::test]
async fn test_belongs_to_via_find_by_id() {
    let repos = repositories();
    let thor = repos.customers.create(Customer::named("Thor")).await.unwrap();
    let odin = repos.customers.create(Customer::named("Odin")).await.unwrap();
    repos
        .addresses
        .create(Address::new("home of Thor Rd.", "Thrudheim", "999", thor.id.clone()))
        .await
        .unwrap();
    let addr2 = repos
        .addresses
        .create(Address::new("home of Odin Rd.", "Valhalla", "000", odin.id.clone()))
        .await
        .unwrap();

    let result = repos
        .addresses
        .find_by_id(addr2.id.clone().unwrap())
        .include("customer")
        .exec()
        .await
        .unwrap();

    assert_eq!(result.entity, addr2);
    assert_eq!(result.relation::<Customer>("customer").unwrap(), Some(odin));
}

#[tokio::test]
async fn test_belongs_to_without_foreign_key_is_left_off() {
    let repos = repositories();
    repos
        .addresses
        .create(Address::new("nowhere", "Ginnungagap", "0", None))
        .await
        .unwrap();
    repos.db.reset_stats();

    let result = repos.addresses.find_many().include("customer").exec().await.unwrap();

    assert!(!result[0].has_relation("customer"));
    // no foreign keys, so only the primary query runs
    assert_eq!(repos.db.query_count(), 1);
}

#[tokio::test]
async fn test_belongs_to_accessor() {
    let repos = repositories();
    let thor = repos.customers.create(Customer::named("Thor")).await.unwrap();
    let address = repos
        .addresses
        .create(Address::new("home of Thor Rd.", "Thrudheim", "999", thor.id.clone()))
        .await
        .unwrap();

    assert_eq!(repos.addresses.customer.get(&address).await.unwrap(), thor);

    let stray = Address::new("moved away", "Midgard", "1", Some(Identifier::Int(77)));
    let err = repos.addresses.customer.get(&stray).await.unwrap_err();
    assert!(err.is_not_found());
}

// ========== hasMany ==========

#[tokio::test]
async fn test_has_many_via_find_many() {
    let repos = repositories();
    let thor = repos.customers.create(Customer::named("Thor")).await.unwrap();
    let hella = repos.customers.create(Customer::named("Hella")).await.unwrap();
    let mjolnir = repos.orders.create(Order::new("Mjolnir", thor.id.clone())).await.unwrap();
    let pizza = repos.orders.create(Order::new("Pizza", thor.id.clone())).await.unwrap();
    let blade = repos.orders.create(Order::new("Blade", hella.id.clone())).await.unwrap();

    let result = repos.customers.find_many().include("orders").exec().await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(
        result[0].relation::<Vec<Order>>("orders").unwrap(),
        Some(vec![mjolnir, pizza])
    );
    assert_eq!(result[1].relation::<Vec<Order>>("orders").unwrap(), Some(vec![blade]));
    assert_eq!(
        serde_json::to_value(&result[1]).unwrap(),
        json!({
            "id": 2,
            "name": "Hella",
            "parent_id": null,
            "orders": [
                { "id": 3, "description": "Blade", "customer_id": 2, "is_shipped": null }
            ]
        })
    );
}

#[tokio::test]
async fn test_has_many_without_targets_is_empty_list() {
    let repos = repositories();
    let thor = repos.customers.create(Customer::named("Thor")).await.unwrap();
    repos.customers.create(Customer::named("Loki")).await.unwrap();
    repos.orders.create(Order::new("Mjolnir", thor.id.clone())).await.unwrap();

    let result = repos.customers.find_many().include("orders").exec().await.unwrap();

    assert_eq!(result[0].relation::<Vec<Order>>("orders").unwrap().map(|o| o.len()), Some(1));
    assert_eq!(result[1].raw_relation("orders"), Some(&json!([])));
}

#[tokio::test]
async fn test_has_many_via_find_by_id() {
    let repos = repositories();
    let thor = repos.customers.create(Customer::named("Thor")).await.unwrap();
    let hella = repos.customers.create(Customer::named("Hella")).await.unwrap();
    repos.orders.create(Order::new("Mjolnir", thor.id.clone())).await.unwrap();
    repos.orders.create(Order::new("Pizza", thor.id.clone())).await.unwrap();
    let blade = repos.orders.create(Order::new("Blade", hella.id.clone())).await.unwrap();

    let result = repos
        .customers
        .find_by_id(hella.id.clone().unwrap())
        .include("orders")
        .exec()
        .await
        .unwrap();

    assert_eq!(result.entity, hella);
    assert_eq!(result.relation::<Vec<Order>>("orders").unwrap(), Some(vec![blade]));
}

#[tokio::test]
async fn test_has_many_self_relation() {
    let repos = repositories();
    let odin = repos.customers.create(Customer::named("Odin")).await.unwrap();
    let mut thor = Customer::named("Thor");
    thor.parent_id = odin.id.clone();
    let thor = repos.customers.create(thor).await.unwrap();

    let result = repos.customers.find_many().include("customers").exec().await.unwrap();

    assert_eq!(result[0].relation::<Vec<Customer>>("customers").unwrap(), Some(vec![thor]));
    assert_eq!(result[1].relation::<Vec<Customer>>("customers").unwrap(), Some(vec![]));
}

#[tokio::test]
async fn test_has_many_repository_find_and_create() {
    let repos = repositories();
    let thor = repos.customers.create(Customer::named("Thor")).await.unwrap();
    let thor_orders = repos.customers.orders.for_entity(&thor).unwrap();

    let order = thor_orders.create(Order::new("Mjolnir", None)).await.unwrap();
    assert_eq!(order.customer_id, thor.id);

    let found = thor_orders.find().await.unwrap();
    assert_eq!(found, vec![order]);
    assert!(repos.customers.orders.for_source(42).find().await.unwrap().is_empty());
}

// ========== hasOne ==========

#[tokio::test]
async fn test_has_one_inclusion_and_access() {
    let repos = repositories();
    let thor = repos.customers.create(Customer::named("Thor")).await.unwrap();
    let loki = repos.customers.create(Customer::named("Loki")).await.unwrap();

    let address = repos
        .customers
        .address
        .for_source(thor.id.clone().unwrap())
        .create(Address::new("home of Thor Rd.", "Thrudheim", "999", None))
        .await
        .unwrap();
    assert_eq!(address.customer_id, thor.id);

    let result = repos.customers.find_many().include("address").exec().await.unwrap();
    assert_eq!(result[0].relation::<Address>("address").unwrap(), Some(address.clone()));
    assert!(!result[1].has_relation("address"));

    let owned = repos.customers.address.for_source(thor.id.unwrap()).get().await.unwrap();
    assert_eq!(owned, address);

    let err = repos.customers.address.for_source(loki.id.unwrap()).get().await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_has_one_get_returns_first_while_inclusion_keeps_last() {
    let repos = repositories();
    let thor = repos.customers.create(Customer::named("Thor")).await.unwrap();
    let thor_address = repos.customers.address.for_source(thor.id.clone().unwrap());

    let first = thor_address
        .create(Address::new("Bilskirnir", "Thrudheim", "1", None))
        .await
        .unwrap();
    let last = thor_address
        .create(Address::new("Valhalla", "Asgard", "2", None))
        .await
        .unwrap();

    assert_eq!(thor_address.get().await.unwrap(), first);

    let result = repos.customers.find_many().include("address").exec().await.unwrap();
    assert_eq!(result[0].relation::<Address>("address").unwrap(), Some(last));
}

// ========== Query bounds ==========

#[tokio::test]
async fn test_one_fetch_per_relation() {
    let repos = repositories();
    for name in ["Thor", "Odin", "Loki", "Hella"] {
        let customer = repos.customers.create(Customer::named(name)).await.unwrap();
        for item in ["shield", "spear"] {
            repos
                .orders
                .create(Order::new(item, customer.id.clone()))
                .await
                .unwrap();
        }
        repos
            .addresses
            .create(Address::new(name, "Asgard", "1", customer.id.clone()))
            .await
            .unwrap();
    }
    repos.db.reset_stats();

    let result = repos
        .customers
        .find_many()
        .include("orders")
        .include("address")
        .include("customers")
        .exec()
        .await
        .unwrap();

    assert_eq!(result.len(), 4);
    assert!(result.iter().all(|c| c.has_relation("orders") && c.has_relation("address")));
    // primary query plus one fetch for each of the three relations
    assert_eq!(repos.db.query_count(), 4);
}

#[tokio::test]
async fn test_pagination_applies_to_sources_only() {
    let repos = repositories();
    for name in ["Thor", "Odin", "Loki"] {
        let customer = repos.customers.create(Customer::named(name)).await.unwrap();
        repos.orders.create(Order::new(name, customer.id.clone())).await.unwrap();
    }

    let result = repos
        .customers
        .find_many()
        .skip(1)
        .take(1)
        .include("orders")
        .exec()
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "Odin");
    assert_eq!(result[0].relation::<Vec<Order>>("orders").unwrap().map(|o| o.len()), Some(1));
}

// ========== Failures ==========

struct UnreachableOrders;

impl TargetRepository<Order> for UnreachableOrders {
    fn find_by_foreign_keys<'a>(
        &'a self,
        _field: &'a str,
        _keys: &'a [Identifier],
    ) -> BoxFuture<'a, QueryResult<Vec<Order>>> {
        Box::pin(async { Err(QueryError::database("connection reset by peer")) })
    }

    fn create(&self, _entity: Order) -> BoxFuture<'_, QueryResult<Order>> {
        Box::pin(async { Err(QueryError::database("connection reset by peer")) })
    }
}

#[tokio::test]
async fn test_fetch_failure_fails_the_include() {
    let repos = repositories();
    repos.customers.create(Customer::named("Thor")).await.unwrap();

    repos
        .customers
        .create_has_many_repository_factory_for::<Order, UnreachableOrders>(
            RelationDefinition::has_many("orders", "Customer", "Order"),
            Getter::fixed(Arc::new(UnreachableOrders)),
        )
        .unwrap();

    let err = repos
        .customers
        .find_many()
        .include("address")
        .include("orders")
        .exec()
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);
    assert!(err.message.contains("connection reset"));
}

#[tokio::test]
async fn test_unbound_target_is_unavailable() {
    let repos = repositories();
    let slot: Deferred<MemoryRepository<Customer>> = Deferred::new();
    let accessor = repos
        .addresses
        .create_belongs_to_accessor_for::<Customer, _>(
            RelationDefinition::belongs_to("owner", "Address", "Customer").key_from("customer_id"),
            slot.getter(),
        )
        .unwrap();
    repos
        .addresses
        .create(Address::new("home of Thor Rd.", "Thrudheim", "999", Some(Identifier::Int(1))))
        .await
        .unwrap();

    let err = repos.addresses.find_many().include("owner").exec().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RepositoryUnavailable);
    assert_eq!(accessor.definition().name, "owner");
}
