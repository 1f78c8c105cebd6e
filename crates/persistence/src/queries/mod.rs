// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query operations, one module per entity.

pub mod billing;
pub mod bookings;
pub mod funding_sources;
pub mod people;
pub mod purchase_orders;
pub mod sessions;
pub mod time_entries;
pub mod time_off;
