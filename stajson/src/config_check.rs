// SPDX-License-Identifier: Apache-2.0

//! Compile-time configuration validation
//!
//! Rejects feature combinations that cannot be honoured together.

// Exactly one integer width must be selected
#[cfg(not(any(feature = "int32", feature = "int64")))]
compile_error!("No integer width features selected: choose one of 'int32' or 'int64'");

#[cfg(all(feature = "int32", feature = "int64"))]
compile_error!(
    "Cannot enable both 'int32' and 'int64' features simultaneously: choose one integer width"
);

// 'float-error' only describes what happens when float parsing is compiled out
#[cfg(all(feature = "float", feature = "float-error"))]
compile_error!("Cannot enable both 'float' and 'float-error' features: 'float-error' is only for when float parsing is disabled");
