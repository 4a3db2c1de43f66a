// Protected handlers: every route here sits behind a permission gate, so
// handlers can rely on an `AuthUser` extension being present.

pub mod drinks;
