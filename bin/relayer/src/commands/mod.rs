//! Contains subcommands for the relayer.

mod gastank;
pub(crate) use gastank::GasTankCommand;

mod relay;
pub(crate) use relay::RelayCommand;

mod sweep;
pub(crate) use sweep::SweepCommand;
