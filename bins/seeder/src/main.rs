//! Reference data seeder for Invoicer development and testing.
//!
//! Seeds InvoiceGo Corp, its customers and vendors, their addresses, the item
//! catalog, eleven orders, eight invoices with line items and six completed
//! payments. All rows use fixed UUIDs so the data set can be referenced from
//! tests and API examples; `00000006-0000-0000-0000-000000000007` is invoice 7.
//!
//! Invoice 8 and its order 11 store totals that disagree with their line
//! items, so the report's computed totals have drift to show.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use invoicer_db::entities::{
    addresses, companies, invoice_items, invoices, items, order_items, orders, payments,
    sea_orm_active_enums::{AddressType, InvoiceStatus, OrderStatus, PaymentStatus},
};

const COMPANIES: u32 = 1;
const ADDRESSES: u32 = 2;
const ITEMS: u32 = 3;
const ORDERS: u32 = 4;
const ORDER_ITEMS: u32 = 5;
const INVOICES: u32 = 6;
const INVOICE_ITEMS: u32 = 7;
const PAYMENTS: u32 = 8;

/// Fixed seed ID: the table tag in the first group, the 1-based row number in the last.
fn seed_id(table: u32, row: u32) -> Uuid {
    Uuid::from_u128((u128::from(table) << 96) | u128::from(row))
}

fn timestamp(value: &str) -> anyhow::Result<DateTimeWithTimeZone> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("bad seed timestamp {value}"))?;
    Ok(naive.and_utc().into())
}

fn date(value: &str) -> anyhow::Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("bad seed date {value}"))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

// ============================================================================
// Data
// ============================================================================

/// (name, contact, email, phone, `is_customer`, `is_vendor`)
const COMPANY_ROWS: [(&str, &str, &str, &str, bool, bool); 21] = [
    ("InvoiceGo Corp", "John Smith", "admin@invoicego.com", "555-1000", false, true),
    ("Alpha Technologies", "Emma Johnson", "emma@alphatech.com", "555-1001", true, false),
    ("Beta Solutions", "Michael Chen", "michael@betasolutions.com", "555-1002", true, false),
    ("Gamma Industries", "Sophia Garcia", "sophia@gammaindustries.com", "555-1003", true, false),
    ("Delta Innovations", "James Williams", "james@deltainno.com", "555-1004", true, false),
    ("Epsilon Software", "Olivia Brown", "olivia@epsilonsoftware.com", "555-1005", true, false),
    ("Zeta Consulting", "William Jones", "william@zetaconsulting.com", "555-1006", true, false),
    ("Eta Manufacturing", "Ava Miller", "ava@etamanufacturing.com", "555-1007", true, false),
    ("Theta Logistics", "Alexander Davis", "alex@thetalogistics.com", "555-1008", true, false),
    ("Iota Services", "Isabella Wilson", "isabella@iotaservices.com", "555-1009", true, false),
    ("Kappa Retail", "Ethan Moore", "ethan@kapparetail.com", "555-1010", true, false),
    ("Lambda Suppliers", "Madison Taylor", "madison@lambdasuppliers.com", "555-1011", false, true),
    ("Mu Electronics", "Jacob Anderson", "jacob@muelectronics.com", "555-1012", false, true),
    ("Nu Packaging", "Emily Thomas", "emily@nupackaging.com", "555-1013", false, true),
    ("Xi Transportation", "Noah Jackson", "noah@xitransportation.com", "555-1014", false, true),
    ("Omicron Materials", "Abigail White", "abigail@omicronmaterials.com", "555-1015", false, true),
    ("Pi Equipment", "Daniel Harris", "daniel@piequipment.com", "555-1016", false, true),
    ("Rho Furniture", "Mia Martin", "mia@rhofurniture.com", "555-1017", false, true),
    ("Sigma IT Solutions", "Matthew Thompson", "matthew@sigmait.com", "555-1018", false, true),
    ("Tau Printing", "Charlotte Garcia", "charlotte@tauprinting.com", "555-1019", false, true),
    ("Upsilon Distributors", "Benjamin Martinez", "benjamin@upsilondist.com", "555-1020", false, true),
];

/// (company, type, street, city, state, postal code)
const ADDRESS_ROWS: [(u32, AddressType, &str, &str, &str, &str); 23] = [
    (1, AddressType::Main, "123 Main Street", "San Francisco", "California", "94105"),
    (1, AddressType::Billing, "123 Main Street, Suite 100", "San Francisco", "California", "94105"),
    (1, AddressType::Shipping, "456 Warehouse Blvd", "Oakland", "California", "94607"),
    (2, AddressType::Billing, "789 Tech Park", "Austin", "Texas", "78701"),
    (2, AddressType::Shipping, "790 Tech Park", "Austin", "Texas", "78701"),
    (3, AddressType::Billing, "456 Innovation Drive", "Boston", "Massachusetts", "02110"),
    (3, AddressType::Shipping, "789 Shipping Lane", "Boston", "Massachusetts", "02110"),
    (4, AddressType::Billing, "101 Industrial Pkwy", "Chicago", "Illinois", "60607"),
    (4, AddressType::Shipping, "102 Warehouse District", "Chicago", "Illinois", "60607"),
    (5, AddressType::Billing, "222 Research Blvd", "Seattle", "Washington", "98101"),
    (5, AddressType::Shipping, "223 Distribution Center", "Seattle", "Washington", "98101"),
    (6, AddressType::Billing, "333 Coding Lane", "Portland", "Oregon", "97201"),
    (6, AddressType::Shipping, "334 Download Drive", "Portland", "Oregon", "97201"),
    (7, AddressType::Billing, "444 Advisory Ave", "New York", "New York", "10001"),
    (7, AddressType::Shipping, "445 Materials Dept", "New York", "New York", "10001"),
    (8, AddressType::Billing, "555 Factory Rd", "Detroit", "Michigan", "48201"),
    (8, AddressType::Shipping, "556 Assembly Line", "Detroit", "Michigan", "48201"),
    (9, AddressType::Billing, "666 Shipping Lane", "Miami", "Florida", "33101"),
    (9, AddressType::Shipping, "667 Port Access Rd", "Miami", "Florida", "33101"),
    (10, AddressType::Billing, "777 Service Street", "Denver", "Colorado", "80202"),
    (10, AddressType::Shipping, "778 Delivery Drive", "Denver", "Colorado", "80202"),
    (11, AddressType::Billing, "888 Shopping Mall", "Las Vegas", "Nevada", "89101"),
    (11, AddressType::Shipping, "889 Retail Row", "Las Vegas", "Nevada", "89101"),
];

/// (name, description, unit price, type, stock)
const ITEM_ROWS: [(&str, &str, Decimal, &str, i32); 20] = [
    ("Standard Widget", "Basic widget for standard use cases", dec!(50.00), "software", 100),
    ("Enterprise Widget", "Advanced widget with premium features", dec!(200.00), "software", 50),
    ("Widget API Access", "API access to widget platform - monthly subscription", dec!(100.00), "subscription", 999),
    ("Mobile Widget", "Widget optimized for mobile devices", dec!(75.00), "software", 100),
    ("Widget Suite", "Complete bundle of all widget products", dec!(350.00), "bundle", 25),
    ("Server Rack", "Standard 42U server rack", dec!(1200.00), "hardware", 10),
    ("Network Switch", "24-port gigabit ethernet switch", dec!(350.00), "hardware", 30),
    ("UPS Battery Backup", "1500VA battery backup system", dec!(275.00), "hardware", 15),
    ("Cat6 Cable (1m)", "Category 6 ethernet cable - 1 meter", dec!(12.50), "hardware", 200),
    ("Fiber Optic Cable (5m)", "Multi-mode fiber optic cable - 5 meters", dec!(35.00), "hardware", 50),
    ("Basic Support Plan", "9-5 weekday support - monthly fee", dec!(150.00), "service", 999),
    ("Premium Support Plan", "24/7 support with 1-hour response time - monthly fee", dec!(500.00), "service", 999),
    ("System Implementation", "Professional implementation services - hourly rate", dec!(125.00), "service", 999),
    ("Staff Training", "On-site staff training - per day", dec!(1000.00), "service", 999),
    ("System Audit", "Comprehensive system security audit", dec!(2500.00), "service", 999),
    ("Conference Room A", "Small conference room (seats 8) - hourly rate", dec!(50.00), "rental", 1),
    ("Conference Room B", "Large conference room (seats 20) - hourly rate", dec!(100.00), "rental", 1),
    ("Executive Boardroom", "Executive boardroom (seats 12) - hourly rate", dec!(150.00), "rental", 1),
    ("Training Lab", "Computer training lab (seats 25) - daily rate", dec!(750.00), "rental", 1),
    ("Event Space", "Open event space (capacity 100) - daily rate", dec!(2000.00), "rental", 1),
];

/// (customer, order date, total price, status)
const ORDER_ROWS: [(u32, &str, Decimal, OrderStatus); 11] = [
    (2, "2025-03-01 10:30:00", dec!(650.00), OrderStatus::Completed),
    (2, "2025-03-15 14:45:00", dec!(500.00), OrderStatus::Completed),
    (3, "2025-03-05 09:15:00", dec!(875.00), OrderStatus::Completed),
    (3, "2025-03-20 11:20:00", dec!(2500.00), OrderStatus::Completed),
    (4, "2025-03-10 13:00:00", dec!(1487.50), OrderStatus::Shipped),
    (4, "2025-03-25 16:30:00", dec!(350.00), OrderStatus::Processing),
    (5, "2025-04-02 08:45:00", dec!(2750.00), OrderStatus::Processing),
    (5, "2025-04-10 10:15:00", dec!(150.00), OrderStatus::Pending),
    (6, "2025-04-05 14:00:00", dec!(200.00), OrderStatus::Pending),
    (6, "2025-04-15 15:30:00", dec!(1000.00), OrderStatus::Pending),
    (2, "2025-04-29 09:00:00", dec!(1250.00), OrderStatus::Pending),
];

/// (order, item, quantity, unit price, item total)
const ORDER_ITEM_ROWS: [(u32, u32, Decimal, Decimal, Decimal); 20] = [
    (1, 1, dec!(5), dec!(50.00), dec!(250.00)),
    (1, 4, dec!(2), dec!(75.00), dec!(150.00)),
    (1, 11, dec!(1), dec!(150.00), dec!(150.00)),
    (1, 9, dec!(8), dec!(12.50), dec!(100.00)),
    (2, 12, dec!(1), dec!(500.00), dec!(500.00)),
    (3, 2, dec!(3), dec!(200.00), dec!(600.00)),
    (3, 3, dec!(1), dec!(100.00), dec!(100.00)),
    (3, 9, dec!(14), dec!(12.50), dec!(175.00)),
    (4, 15, dec!(1), dec!(2500.00), dec!(2500.00)),
    (5, 7, dec!(4), dec!(350.00), dec!(1400.00)),
    (5, 10, dec!(2.5), dec!(35.00), dec!(87.50)),
    (6, 7, dec!(1), dec!(350.00), dec!(350.00)),
    (7, 6, dec!(2), dec!(1200.00), dec!(2400.00)),
    (7, 10, dec!(10), dec!(35.00), dec!(350.00)),
    (8, 11, dec!(1), dec!(150.00), dec!(150.00)),
    (9, 1, dec!(4), dec!(50.00), dec!(200.00)),
    (10, 14, dec!(1), dec!(1000.00), dec!(1000.00)),
    (11, 1, dec!(15), dec!(50.00), dec!(750.00)),
    (11, 4, dec!(5), dec!(75.00), dec!(375.00)),
    (11, 11, dec!(1), dec!(150.00), dec!(150.00)),
];

struct InvoiceRow {
    recipient: u32,
    billing: u32,
    shipping: u32,
    order: u32,
    number: &'static str,
    issued: &'static str,
    due: &'static str,
    subject: &'static str,
    subtotal: Decimal,
    tax: Decimal,
    paid: Decimal,
    status: InvoiceStatus,
    notes: &'static str,
}

/// All invoices are sent by company 1.
const INVOICE_ROWS: [InvoiceRow; 8] = [
    InvoiceRow { recipient: 2, billing: 4, shipping: 5, order: 1, number: "INV-2025-0001", issued: "2025-03-01", due: "2025-03-31", subject: "March Services and Products", subtotal: dec!(650.00), tax: dec!(52.00), paid: dec!(702.00), status: InvoiceStatus::Paid, notes: "Thank you for your business!" },
    InvoiceRow { recipient: 2, billing: 4, shipping: 5, order: 2, number: "INV-2025-0002", issued: "2025-03-15", due: "2025-04-14", subject: "Premium Support Plan", subtotal: dec!(500.00), tax: dec!(40.00), paid: dec!(540.00), status: InvoiceStatus::Paid, notes: "Premium support plan monthly fee" },
    InvoiceRow { recipient: 3, billing: 6, shipping: 7, order: 3, number: "INV-2025-0003", issued: "2025-03-05", due: "2025-04-04", subject: "Software Licenses and Services", subtotal: dec!(875.00), tax: dec!(70.00), paid: dec!(945.00), status: InvoiceStatus::Paid, notes: "" },
    InvoiceRow { recipient: 3, billing: 6, shipping: 7, order: 4, number: "INV-2025-0004", issued: "2025-03-20", due: "2025-04-19", subject: "System Audit Services", subtotal: dec!(2500.00), tax: dec!(200.00), paid: dec!(2700.00), status: InvoiceStatus::Paid, notes: "Comprehensive security audit completed" },
    InvoiceRow { recipient: 4, billing: 8, shipping: 9, order: 5, number: "INV-2025-0005", issued: "2025-03-10", due: "2025-04-09", subject: "Network Equipment Order", subtotal: dec!(1487.50), tax: dec!(119.00), paid: dec!(1606.50), status: InvoiceStatus::Paid, notes: "" },
    InvoiceRow { recipient: 4, billing: 8, shipping: 9, order: 6, number: "INV-2025-0006", issued: "2025-03-25", due: "2025-04-24", subject: "Network Switch", subtotal: dec!(350.00), tax: dec!(28.00), paid: dec!(0.00), status: InvoiceStatus::Sent, notes: "" },
    InvoiceRow { recipient: 5, billing: 10, shipping: 11, order: 7, number: "INV-2025-0007", issued: "2025-04-02", due: "2025-05-02", subject: "Server Equipment Order", subtotal: dec!(2750.00), tax: dec!(220.00), paid: dec!(1500.00), status: InvoiceStatus::Partial, notes: "Partial payment received" },
    InvoiceRow { recipient: 2, billing: 4, shipping: 5, order: 11, number: "INV-2025-0500", issued: "2025-04-30", due: "2025-05-30", subject: "April Products and Services", subtotal: dec!(1250.00), tax: dec!(100.00), paid: dec!(0.00), status: InvoiceStatus::Sent, notes: "Example invoice for demonstration" },
];

/// (invoice, item, description, quantity, unit price, item total, tax rate)
const INVOICE_ITEM_ROWS: [(u32, u32, &str, Decimal, Decimal, Decimal, Decimal); 17] = [
    (1, 1, "Standard Widget", dec!(5), dec!(50.00), dec!(250.00), dec!(8.00)),
    (1, 4, "Mobile Widget", dec!(2), dec!(75.00), dec!(150.00), dec!(8.00)),
    (1, 11, "Basic Support Plan", dec!(1), dec!(150.00), dec!(150.00), dec!(8.00)),
    (1, 9, "Cat6 Cable (1m)", dec!(8), dec!(12.50), dec!(100.00), dec!(8.00)),
    (2, 12, "Premium Support Plan", dec!(1), dec!(500.00), dec!(500.00), dec!(8.00)),
    (3, 2, "Enterprise Widget", dec!(3), dec!(200.00), dec!(600.00), dec!(8.00)),
    (3, 3, "Widget API Access", dec!(1), dec!(100.00), dec!(100.00), dec!(8.00)),
    (3, 9, "Cat6 Cable (1m)", dec!(14), dec!(12.50), dec!(175.00), dec!(8.00)),
    (4, 15, "System Audit", dec!(1), dec!(2500.00), dec!(2500.00), dec!(8.00)),
    (5, 7, "Network Switch", dec!(4), dec!(350.00), dec!(1400.00), dec!(8.00)),
    (5, 10, "Fiber Optic Cable (5m)", dec!(2.5), dec!(35.00), dec!(87.50), dec!(8.00)),
    (6, 7, "Network Switch", dec!(1), dec!(350.00), dec!(350.00), dec!(8.00)),
    (7, 6, "Server Rack", dec!(2), dec!(1200.00), dec!(2400.00), dec!(8.00)),
    (7, 10, "Fiber Optic Cable (5m)", dec!(10), dec!(35.00), dec!(350.00), dec!(8.00)),
    (8, 1, "Standard Widget", dec!(15), dec!(50.00), dec!(750.00), dec!(8.00)),
    (8, 4, "Mobile Widget", dec!(5), dec!(75.00), dec!(375.00), dec!(8.00)),
    (8, 11, "Basic Support Plan", dec!(1), dec!(150.00), dec!(150.00), dec!(8.00)),
];

/// (invoice, payment date, amount, method, reference)
const PAYMENT_ROWS: [(u32, &str, Decimal, &str, &str); 6] = [
    (1, "2025-03-15 14:30:00", dec!(702.00), "bank_transfer", "BANK-20250315-A2C1"),
    (2, "2025-03-20 09:45:00", dec!(540.00), "credit_card", "CC-20250320-B3D2"),
    (3, "2025-03-25 11:15:00", dec!(945.00), "bank_transfer", "BANK-20250325-C4E3"),
    (4, "2025-04-01 10:30:00", dec!(2700.00), "bank_transfer", "BANK-20250401-D5F4"),
    (5, "2025-04-05 16:00:00", dec!(1606.50), "credit_card", "CC-20250405-E6G5"),
    (7, "2025-04-10 13:20:00", dec!(1500.00), "bank_transfer", "BANK-20250410-F7H6"),
];

// ============================================================================
// Seeding
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = invoicer_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    if already_seeded(&db).await? {
        println!("Reference data already present, skipping.");
        return Ok(());
    }

    let txn = db.begin().await?;

    println!("Seeding companies...");
    seed_companies(&txn).await?;
    println!("Seeding addresses...");
    seed_addresses(&txn).await?;
    println!("Seeding items...");
    seed_items(&txn).await?;
    println!("Seeding orders...");
    seed_orders(&txn).await?;
    println!("Seeding invoices...");
    seed_invoices(&txn).await?;
    println!("Seeding payments...");
    seed_payments(&txn).await?;

    txn.commit().await?;
    println!("Seeding complete!");
    Ok(())
}

async fn already_seeded(db: &DatabaseConnection) -> anyhow::Result<bool> {
    let first = companies::Entity::find_by_id(seed_id(COMPANIES, 1))
        .one(db)
        .await?;
    Ok(first.is_some())
}

async fn seed_companies<C: ConnectionTrait>(db: &C) -> anyhow::Result<()> {
    for (row, (name, contact, email, phone, is_customer, is_vendor)) in
        (1..).zip(COMPANY_ROWS)
    {
        companies::ActiveModel {
            id: Set(seed_id(COMPANIES, row)),
            company_name: Set(name.to_string()),
            contact_person: Set(Some(contact.to_string())),
            email: Set(Some(email.to_string())),
            phone: Set(Some(phone.to_string())),
            is_customer: Set(is_customer),
            is_vendor: Set(is_vendor),
            default_billing_address_id: Set(None),
            default_shipping_address_id: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("company {name}"))?;
    }
    Ok(())
}

async fn seed_addresses<C: ConnectionTrait>(db: &C) -> anyhow::Result<()> {
    for (row, (company, address_type, street, city, state, postal_code)) in
        (1..).zip(ADDRESS_ROWS)
    {
        addresses::ActiveModel {
            id: Set(seed_id(ADDRESSES, row)),
            company_id: Set(seed_id(COMPANIES, company)),
            address_type: Set(address_type),
            street: Set(street.to_string()),
            city: Set(city.to_string()),
            state_province: Set(Some(state.to_string())),
            postal_code: Set(Some(postal_code.to_string())),
            country: Set("United States".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("address {row}"))?;
    }
    Ok(())
}

async fn seed_items<C: ConnectionTrait>(db: &C) -> anyhow::Result<()> {
    for (row, (name, description, unit_price, item_type, stock)) in (1..).zip(ITEM_ROWS) {
        items::ActiveModel {
            id: Set(seed_id(ITEMS, row)),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            unit_price: Set(unit_price),
            item_type: Set(item_type.to_string()),
            stock: Set(stock),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("item {name}"))?;
    }
    Ok(())
}

async fn seed_orders<C: ConnectionTrait>(db: &C) -> anyhow::Result<()> {
    for (row, (customer, order_date, total_price, status)) in (1..).zip(ORDER_ROWS) {
        orders::ActiveModel {
            id: Set(seed_id(ORDERS, row)),
            customer_company_id: Set(seed_id(COMPANIES, customer)),
            order_date: Set(timestamp(order_date)?),
            total_price: Set(total_price),
            status: Set(status),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("order {row}"))?;
    }

    for (row, (order, item, quantity, unit_price, item_total)) in (1..).zip(ORDER_ITEM_ROWS) {
        order_items::ActiveModel {
            id: Set(seed_id(ORDER_ITEMS, row)),
            order_id: Set(seed_id(ORDERS, order)),
            item_id: Set(seed_id(ITEMS, item)),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            item_total: Set(item_total),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("order item {row}"))?;
    }
    Ok(())
}

async fn seed_invoices<C: ConnectionTrait>(db: &C) -> anyhow::Result<()> {
    for (row, invoice) in (1..).zip(INVOICE_ROWS) {
        let grand_total = invoice.subtotal + invoice.tax;
        invoices::ActiveModel {
            id: Set(seed_id(INVOICES, row)),
            invoice_number: Set(invoice.number.to_string()),
            sender_company_id: Set(seed_id(COMPANIES, 1)),
            recipient_company_id: Set(seed_id(COMPANIES, invoice.recipient)),
            billing_address_id: Set(seed_id(ADDRESSES, invoice.billing)),
            shipping_address_id: Set(Some(seed_id(ADDRESSES, invoice.shipping))),
            order_id: Set(Some(seed_id(ORDERS, invoice.order))),
            invoice_subject: Set(Some(invoice.subject.to_string())),
            invoice_date: Set(date(invoice.issued)?),
            due_date: Set(date(invoice.due)?),
            subtotal: Set(invoice.subtotal),
            tax_total: Set(invoice.tax),
            grand_total: Set(grand_total),
            amount_paid: Set(invoice.paid),
            amount_due: Set(grand_total - invoice.paid),
            status: Set(invoice.status),
            notes: Set(non_empty(invoice.notes)),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("invoice {}", invoice.number))?;
    }

    for (row, (invoice, item, description, quantity, unit_price, item_total, tax_rate)) in
        (1..).zip(INVOICE_ITEM_ROWS)
    {
        invoice_items::ActiveModel {
            id: Set(seed_id(INVOICE_ITEMS, row)),
            invoice_id: Set(seed_id(INVOICES, invoice)),
            item_id: Set(Some(seed_id(ITEMS, item))),
            description: Set(description.to_string()),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            item_total: Set(item_total),
            tax_rate_percentage: Set(tax_rate),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("invoice item {row}"))?;
    }
    Ok(())
}

async fn seed_payments<C: ConnectionTrait>(db: &C) -> anyhow::Result<()> {
    for (row, (invoice, payment_date, amount, method, reference)) in (1..).zip(PAYMENT_ROWS) {
        payments::ActiveModel {
            id: Set(seed_id(PAYMENTS, row)),
            invoice_id: Set(seed_id(INVOICES, invoice)),
            payment_date: Set(timestamp(payment_date)?),
            amount: Set(amount),
            method: Set(method.to_string()),
            status: Set(PaymentStatus::Completed),
            transaction_reference: Set(Some(reference.to_string())),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("payment {reference}"))?;
    }
    Ok(())
}
