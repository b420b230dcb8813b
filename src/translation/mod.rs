/*!
 * Translation service for Markdown segments using remote providers.
 *
 * This module contains the boundary to the external translation collaborator.
 * It is split into two submodules:
 *
 * - `core`: provider construction and the bounded-retry translation call
 * - `dispatch`: concurrent per-segment dispatch with positional reassembly
 */

// Re-export main types for easier usage
pub use self::core::{ProviderClient, TranslationService};
pub use self::dispatch::SegmentDispatcher;

// Submodules
pub mod core;
pub mod dispatch;
