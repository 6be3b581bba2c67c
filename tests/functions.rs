#[macro_use]
mod cases;

test_case! {
    name: max_of_two,
    input: "Max(1; 2)",
    tree: "Max(1; 2)",
    eval: { 0.0 => 2.0 },
}

test_case! {
    name: abs_of_negative_literal,
    input: "Abs(-5)",
    tree: "Abs(-5)",
    eval: { 0.0 => 5.0 },
}

test_case! {
    name: nested_calls,
    input: "Min(Abs(-2); 3)",
    tree: "Min(Abs(-2); 3)",
    eval: { 0.0 => 2.0 },
}

test_case! {
    name: arguments_are_full_expressions,
    input: "Max(In + 1; 2 * 3) * 2",
    tree: "(Max((In + 1); (2 * 3)) * 2)",
    eval: { 0.0 => 12.0, 9.0 => 20.0 },
}

test_case! {
    name: negated_call,
    input: "-Abs(In)",
    tree: "(-Abs(In))",
    eval: { -3.0 => -3.0, 3.0 => -3.0 },
}

test_case! {
    name: empty_argument_is_zero,
    input: "Max(-1;)",
    tree: "Max(-1; 0)",
    eval: { 5.0 => 0.0 },
}

test_case! {
    name: clamp_is_ternary,
    input: "Clamp(In; 0; 10)",
    eval: { -5.0 => 0.0, 5.0 => 5.0, 15.0 => 10.0 },
}

test_case! {
    name: pow_and_sqrt,
    input: "Pow(In; 2) + Sqrt(16)",
    eval: { 3.0 => 13.0, -3.0 => 13.0 },
}

test_case! {
    name: rounding_family,
    input: "Round(In) + Floor(In) + Ceil(In)",
    eval: { 2.5 => 8.0, -2.5 => -8.0 },
}

test_case! {
    name: variadic_sum,
    input: "Sum(In; 1; 2)",
    tree: "Sum(In; 1; 2)",
    eval: { 1.0 => 4.0 },
}

test_case! {
    name: variadic_without_arguments,
    input: "Sum()",
    tree: "Sum()",
    eval: { 1.0 => 0.0 },
}

test_case! {
    name: empty_sum_is_positive_zero,
    input: "1 / Sum()",
    eval: { 0.0 => f64::INFINITY },
}

test_case! {
    name: whitespace_before_argument_list,
    input: "Abs (In)",
    tree: "Abs(In)",
    eval: { -2.0 => 2.0 },
}
