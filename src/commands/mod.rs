// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod projects;
pub mod transactions;
pub mod records;
pub mod reports;
pub mod dashboard;
pub mod keywords;
pub mod importer;
pub mod exporter;
pub mod seed;
pub mod doctor;
