//! Template corpus loading, training and evaluation

pub mod progress;
pub mod corpus;
pub mod evaluation;
pub mod driver;

pub use progress::{ChannelSink, JsonLinesSink, NullSink, ProgressEvent, ProgressSink};
pub use corpus::{discover_classes, load_class, load_sequence_file, sequence_files, ClassCorpus, SkippedFile};
pub use evaluation::{leave_one_out, LeaveOneOutReport};
pub use driver::{train, TrainingSummary};
