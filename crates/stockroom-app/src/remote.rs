// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{RemoteError, Resource};

/// One server-side collection, addressed as `<collection>` and `<collection>/<id>`.
pub trait RemoteCollection<R: Resource> {
    /// `GET <collection>[?filter=value]`
    fn list(&mut self, filter: Option<&str>) -> Result<Vec<R>, RemoteError>;
    /// `POST <collection>`
    fn create(&mut self, draft: &R::Draft) -> Result<(), RemoteError>;
    /// `PUT <collection>/<id>`
    fn update(&mut self, id: &R::Id, draft: &R::Draft) -> Result<(), RemoteError>;
    /// `DELETE <collection>/<id>`
    fn delete(&mut self, id: &R::Id) -> Result<(), RemoteError>;
}
