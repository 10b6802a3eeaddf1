//! Protobuf messages of the UShER mutation-annotated tree format
//! (`parsimony.proto`, package `Parsimony`).
//!
//! Only the `data` message and its parts are needed. Nucleotides are encoded
//! as indices `A=0, C=1, G=2, T=3`.

/// `message mut`: one substitution.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Mut {
    #[prost(int32, tag = "1")]
    pub position: i32,
    #[prost(int32, tag = "2")]
    pub ref_nuc: i32,
    #[prost(int32, tag = "3")]
    pub par_nuc: i32,
    #[prost(int32, repeated, tag = "4")]
    pub mut_nuc: ::prost::alloc::vec::Vec<i32>,
    #[prost(string, tag = "5")]
    pub chromosome: ::prost::alloc::string::String,
}

/// `message mutation_list`: mutations on the edge into one node.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MutationList {
    #[prost(message, repeated, tag = "1")]
    pub mutation: ::prost::alloc::vec::Vec<Mut>,
}

/// `message condensed_node`: a leaf standing for several identical samples.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CondensedNode {
    #[prost(string, tag = "1")]
    pub node_name: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub condensed_leaves: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

/// `message node_metadata`: lineage annotation of one node.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NodeMetadata {
    #[prost(string, tag = "1")]
    pub clade: ::prost::alloc::string::String,
}

/// `message data`: the whole tree. `node_mutations` and `metadata` are
/// aligned with the pre-order of the nodes in `newick`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Data {
    #[prost(string, tag = "1")]
    pub newick: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub node_mutations: ::prost::alloc::vec::Vec<MutationList>,
    #[prost(message, repeated, tag = "3")]
    pub condensed_nodes: ::prost::alloc::vec::Vec<CondensedNode>,
    #[prost(message, repeated, tag = "4")]
    pub metadata: ::prost::alloc::vec::Vec<NodeMetadata>,
}
