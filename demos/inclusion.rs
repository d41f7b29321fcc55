//! Relation inclusion against the in-memory connector.
//!
//! Run with:
//!
//! ```sh
//! RELINK_DEBUG=1 cargo run --example inclusion --features tracing-subscriber
//! cargo run --example inclusion --features tracing-subscriber -- --debug
//! ```

use std::sync::Arc;

use relink::prelude::*;
use relink::query::logging;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Customer {
    id: Option<Identifier>,
    name: String,
}

impl Entity for Customer {
    const MODEL_NAME: &'static str = "Customer";

    fn key(&self, field: &str) -> Option<Identifier> {
        match field {
            "id" => self.id.clone(),
            _ => None,
        }
    }

    fn set_key(&mut self, field: &str, value: Identifier) -> QueryResult<()> {
        match field {
            "id" => self.id = Some(value),
            _ => return Err(QueryError::unknown_field(Self::MODEL_NAME, field)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Order {
    id: Option<Identifier>,
    description: String,
    customer_id: Option<Identifier>,
}

impl Entity for Order {
    const MODEL_NAME: &'static str = "Order";

    fn key(&self, field: &str) -> Option<Identifier> {
        match field {
            "id" => self.id.clone(),
            "customer_id" => self.customer_id.clone(),
            _ => None,
        }
    }

    fn set_key(&mut self, field: &str, value: Identifier) -> QueryResult<()> {
        match field {
            "id" => self.id = Some(value),
            "customer_id" => self.customer_id = Some(value),
            _ => return Err(QueryError::unknown_field(Self::MODEL_NAME, field)),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> QueryResult<()> {
    if std::env::args().any(|arg| arg == "--debug") {
        logging::init_debug();
    } else {
        logging::init();
    }

    let db = MemoryDataSource::new(MemoryConfig::new("demo").id_type(IdType::ObjectId));
    let customers = Arc::new(MemoryRepository::<Customer>::new(&db)?);
    let orders = Arc::new(MemoryRepository::<Order>::new(&db)?);

    let customer_orders: HasManyRepositoryFactory<Customer, Order, _> = customers
        .create_has_many_repository_factory_for(
            RelationDefinition::has_many("orders", "Customer", "Order"),
            Getter::fixed(orders.clone()),
        )?;
    let order_customer: BelongsToAccessor<Order, Customer, _> = orders
        .create_belongs_to_accessor_for(
            RelationDefinition::belongs_to("customer", "Order", "Customer"),
            Getter::fixed(customers.clone()),
        )?;

    for name in ["Thor", "Odin", "Loki"] {
        let customer = customers
            .create(Customer {
                id: None,
                name: name.to_string(),
            })
            .await?;
        let placed = customer_orders.for_entity(&customer)?;
        for item in ["Mjolnir", "Pizza"] {
            placed
                .create(Order {
                    id: None,
                    description: format!("{} for {}", item, name),
                    customer_id: None,
                })
                .await?;
        }
    }

    db.reset_stats();
    let with_orders = customers.find_many().include("orders").exec().await?;
    info!(
        customers = with_orders.len(),
        queries = db.query_count(),
        "loaded customers with orders"
    );
    for customer in &with_orders {
        let placed = customer.relation::<Vec<Order>>("orders")?.unwrap_or_default();
        println!("{}: {} orders", customer.name, placed.len());
    }

    let first = orders.find_all().await?;
    if let Some(order) = first.first() {
        let owner = order_customer.get(order).await?;
        println!("{} belongs to {}", order.description, owner.name);
    }

    match customers.find_many().include("wishlist").exec().await {
        Ok(_) => println!("unexpected success"),
        Err(err) => println!("{}", err.display_full()),
    }

    Ok(())
}
