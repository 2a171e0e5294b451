//! Diesel-backed persistence adapters for the workflow ports.

pub mod diesel_client_directory;
pub mod diesel_counter_store;
pub mod diesel_invoice_repository;
pub mod diesel_login_service;
pub mod diesel_milestone_repository;
pub mod diesel_notification_repository;
pub mod diesel_order_repository;
pub mod diesel_order_status_repository;
pub mod diesel_proposal_repository;
pub mod diesel_staff_directory;
pub mod diesel_task_repository;
pub mod diesel_ticket_repository;
mod error_mapping;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_client_directory::DieselClientDirectory;
pub use diesel_counter_store::DieselCounterStore;
pub use diesel_invoice_repository::DieselInvoiceRepository;
pub use diesel_login_service::DieselLoginService;
pub use diesel_milestone_repository::DieselMilestoneRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_order_status_repository::DieselOrderStatusRepository;
pub use diesel_proposal_repository::DieselProposalRepository;
pub use diesel_staff_directory::DieselStaffDirectory;
pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
