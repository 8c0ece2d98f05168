/*
 * Responsibility
 * - ユーザー/ロール情報を提供する外部コラボレータ (IdentityProvider) の契約
 * - 開発・テスト用の in-memory 実装
 */
pub mod memory;
pub mod provider;

pub use memory::InMemoryIdentityProvider;
pub use provider::{IdentityError, IdentityProvider, RoleRecord, UserRecord};
