//! Centralized limits and thresholds for model extraction.
//!
//! Both traversals (declaration closure and parser-model synthesis) walk a
//! host-provided type graph that may be cyclic. Named cycles are cut by the
//! symbol memo; everything else is bounded by the values below.
//!
//! The recursion guard in `phero-model` reads its defaults from here, and
//! `ExtractOptions` lets callers override the depth and iteration budgets.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth for parser-model synthesis.
///
/// Every structural expansion (union, array, object, named resolution) adds
/// one level. Exceeding it raises a `RecursionLimit` extraction error instead
/// of growing the stack.
///
/// # TypeScript example
///
/// ```typescript
/// // Anonymous shapes nest one level per property:
/// type Deep = { a: { b: { c: { d: { /* ... 200 levels ... */ } } } } };
/// ```
pub const MAX_SYNTHESIS_DEPTH: u32 = 200;

/// Maximum nesting depth for the declaration closure walk.
///
/// Counts nested type positions plus declaration expansions on the current
/// path. Named declarations are deduplicated, so only deeply nested
/// anonymous syntax can reach this.
pub const MAX_CLOSURE_DEPTH: u32 = 500;

/// Maximum number of reference hops followed when resolving a named
/// reference to the type it denotes.
///
/// # TypeScript example
///
/// ```typescript
/// type A = B;
/// type B = C;
/// // ... 64 aliases later ...
/// type Z = string;
/// ```
pub const MAX_REFERENCE_HOPS: u32 = 64;

// =============================================================================
// Operation Counts
// =============================================================================

/// Total budget of guarded enter attempts per top-level call.
///
/// Bounds total work for pathological but acyclic graphs (wide shared
/// anonymous sub-graphs are re-expanded at every use site).
pub const MAX_EXTRACTION_ITERATIONS: u32 = 100_000;

/// Maximum number of keys simultaneously on the visiting path.
pub const MAX_VISITING_SET_SIZE: u32 = 10_000;
