mod test_builtin_basic;
mod test_custom_surfaces;
mod test_sampler_shapes;
