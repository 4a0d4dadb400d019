//! Runs one order through the pipeline against the configured webhook.
//!
//! ```text
//! orderflow [TIER] [STATUS...]
//! ORDERFLOW_WEBHOOK_URL=http://localhost:9000/hook orderflow vip processing shipped
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use orderflow_core::{CustomerId, Decimal};
use orderflow_infra::{
    AppConfig, CreateOrder, InMemoryCustomerDirectory, InMemoryOrderRepository, OrderService,
    OrderServiceError,
};
use orderflow_parties::Customer;
use orderflow_sales::OrderLine;

fn main() -> ExitCode {
    orderflow_observability::init();

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "order run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), OrderServiceError> {
    let mut args = args.into_iter();
    let tier = args.next().unwrap_or_else(|| "regular".to_string());

    let customers = Arc::new(InMemoryCustomerDirectory::new());
    let customer = Customer::new(CustomerId::new(), "Demo Customer", "demo@example.com")
        .with_tier_tag(tier);
    let customer_id = customer.id;
    customers.upsert(customer);

    let config = AppConfig::from_env();
    let service = OrderService::from_config(&config, InMemoryOrderRepository::new(), customers)?;

    let lines = vec![
        OrderLine::new("Keyboard", 1, Decimal::new(30_00, 2)),
        OrderLine::new("Cable", 2, Decimal::new(7_75, 2)),
    ];
    let order = service.create_order(CreateOrder::today(customer_id, lines))?;
    for status in args {
        service.update_status(order.id_typed(), &status)?;
    }

    for order in service.repository().list()? {
        let json = serde_json::to_string_pretty(&order)
            .map_err(|e| OrderServiceError::Repository(e.to_string()))?;
        println!("{json}");
    }
    Ok(())
}
